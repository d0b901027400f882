use anyhow::{anyhow, Result};
use scout_catalog::TitleLookup;
use scout_core::{
    InfiniteScrollTrigger, LoadMoreViewport, MovieCatalogService, MovieKind, MovieSummary, PersistentKeyValueStore,
    SearchController, SearchStatus, Settlement, StarredCollection,
};
use std::sync::Arc;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Filter(Option<MovieKind>),
    More,
    List,
    Star(usize),
    Starred,
    Show(usize),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let cmd = match word.to_ascii_lowercase().as_str() {
            "search" | "s" => Command::Search(rest.to_string()),
            "filter" | "f" => match rest.to_ascii_lowercase().as_str() {
                "" | "all" => Command::Filter(None),
                kind => Command::Filter(Some(kind.parse()?)),
            },
            "more" | "m" => Command::More,
            "list" | "ls" => Command::List,
            "star" => Command::Star(index(rest)?),
            "starred" => Command::Starred,
            "show" | "open" => Command::Show(index(rest)?),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(anyhow!("unknown command `{other}`, try `help`")),
        };
        Ok(Some(cmd))
    }
}

/// 1-based position in the rendered list.
fn index(arg: &str) -> Result<usize> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(anyhow!("expected a result number, got `{arg}`")),
    }
}

pub const HELP: &str = "\
commands:
  search <term>      start a new search (empty term clears)
  filter <type>      all | movie | series | episode
  more               load the next page
  list               print loaded results
  star <n>           star/unstar result n
  starred            print starred titles
  show <n>           details for result n
  quit";

pub struct Session<C: MovieCatalogService + TitleLookup, S: PersistentKeyValueStore> {
    catalog: Arc<C>,
    controller: SearchController<C>,
    trigger: InfiniteScrollTrigger<LoadMoreViewport>,
    starred: StarredCollection<S>,
    rendered: usize,
}

impl<C: MovieCatalogService + TitleLookup, S: PersistentKeyValueStore> Session<C, S> {
    pub fn new(catalog: Arc<C>, store: S) -> Self {
        Self {
            controller: SearchController::new(catalog.clone()),
            catalog,
            trigger: InfiniteScrollTrigger::new(LoadMoreViewport::new()),
            starred: StarredCollection::load(store),
            rendered: 0,
        }
    }

    pub fn in_flight(&self) -> bool { self.controller.in_flight() > 0 }

    pub async fn settle_next(&mut self) -> Option<Settlement> {
        self.controller.settle_next().await
    }

    /// Run one command. Returns `false` when the user asked to quit.
    pub async fn handle(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Search(term) => {
                let kind = self.controller.state().query().kind;
                self.controller.submit_query(&term, kind);
                self.reset_view();
            }
            Command::Filter(kind) => {
                self.controller.change_filter(kind);
                self.reset_view();
            }
            Command::More => self.load_more(),
            Command::List => {
                self.rendered = 0;
                self.render();
            }
            Command::Star(n) => match self.result(n) {
                Some(movie) => {
                    let now = self.starred.toggle(&movie);
                    println!("{} {}", if now { "starred" } else { "unstarred" }, movie.title);
                }
                None => println!("no result #{n}"),
            },
            Command::Starred => self.print_starred(),
            Command::Show(n) => self.show(n).await,
            Command::Help => println!("{HELP}"),
            Command::Quit => return false,
        }
        true
    }

    /// Report a settled fetch to the user.
    pub fn on_settled(&mut self, settlement: Settlement) {
        if settlement == Settlement::Applied {
            self.render();
        }
    }

    fn reset_view(&mut self) {
        self.rendered = 0;
        self.trigger.sync(self.controller.state().items());
        if self.controller.state().is_loading() {
            println!("searching...");
        }
    }

    fn load_more(&mut self) {
        let Some(target) = self.trigger.viewport().visible_target().map(str::to_owned) else {
            println!("nothing to load");
            return;
        };
        if self.trigger.on_visible(&target, &mut self.controller) {
            println!("loading more movies...");
        } else if self.controller.state().is_loading() {
            println!("still loading...");
        } else {
            println!("all {} results loaded", self.controller.state().total_results());
        }
    }

    fn render(&mut self) {
        let state = self.controller.state();
        match state.status() {
            SearchStatus::Error => println!("error: {}", state.error_message().unwrap_or("request failed")),
            SearchStatus::Success if state.items().is_empty() => println!("No results found."),
            _ => {}
        }
        for (i, movie) in state.items().iter().enumerate().skip(self.rendered) {
            println!("{}", line(i + 1, movie, self.starred.is_starred(&movie.id)));
        }
        self.rendered = state.items().len();
        if state.status() == SearchStatus::Success && state.total_results() > 0 {
            println!(
                "-- {} of {} ({} pages){}",
                state.items().len(),
                state.total_results(),
                state.total_pages(),
                if state.is_exhausted() { "" } else { ", `more` for next page" }
            );
        }
        self.trigger.sync(state.items());
    }

    fn print_starred(&self) {
        if self.starred.is_empty() {
            println!("You have not starred any movies yet.");
            return;
        }
        for (i, movie) in self.starred.iter().enumerate() {
            println!("{}", line(i + 1, movie, true));
        }
    }

    async fn show(&self, n: usize) {
        let Some(movie) = self.result(n) else {
            println!("no result #{n}");
            return;
        };
        match self.catalog.details(&movie.id).await {
            Ok(d) => {
                println!("{} ({}) [{}] {}", d.title, d.year, d.kind, d.id);
                println!("  {} | {} | {}", d.rated, d.runtime, d.genre);
                println!("  director: {}", d.director);
                println!("  cast: {}", d.actors);
                println!("  rating: {}", d.imdb_rating);
                println!("  {}", d.plot);
            }
            Err(e) => println!("error: {e}"),
        }
    }

    fn result(&self, n: usize) -> Option<MovieSummary> {
        self.controller.state().items().get(n - 1).cloned()
    }
}

fn line(n: usize, movie: &MovieSummary, starred: bool) -> String {
    format!("{n:>4}. {} {} ({}) [{}] {}", if starred { "*" } else { " " }, movie.title, movie.year, movie.kind, movie.id)
}
