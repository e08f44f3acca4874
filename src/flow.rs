// Interactive driver: authenticate, then narrow organizations -> terminal
// groups -> tables with the operator and show the orders on those tables.
//
// The run only moves forward. Each listing feeds the next call's filter and
// the first failure or empty listing ends it.

use crate::api::{DateRange, PosApi};
use crate::error::FlowError;
use crate::models::Order;
use crate::present;
use crate::selection::{pick, Selector};
use std::fmt;
use std::io::Write;
use tracing::{debug, error, info};

/// Position of a run in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    Authenticated,
    OrgsListed,
    OrgsSelected,
    GroupsListed,
    GroupsSelected,
    SectionsListed,
    TablesSelected,
    OrdersFetched,
    Displayed,
    End,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Authenticated => "authenticated",
            Stage::OrgsListed => "organizations listed",
            Stage::OrgsSelected => "organizations selected",
            Stage::GroupsListed => "terminal groups listed",
            Stage::GroupsSelected => "terminal groups selected",
            Stage::SectionsListed => "sections listed",
            Stage::TablesSelected => "tables selected",
            Stage::OrdersFetched => "orders fetched",
            Stage::Displayed => "displayed",
            Stage::End => "end",
        };
        f.write_str(name)
    }
}

/// Inputs fixed for the whole run.
#[derive(Debug, Clone)]
pub struct Query {
    pub api_login: String,
    pub range: DateRange,
    pub statuses: Vec<String>,
}

/// What a completed run selected and fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub organization_ids: Vec<String>,
    pub terminal_group_ids: Vec<String>,
    pub table_ids: Vec<String>,
    pub orders: Vec<Order>,
}

/// One pass through the pipeline against `api`, asking `selector` at each
/// menu and writing everything the operator sees to `out`.
pub struct Session<'a, A, S, W> {
    api: &'a mut A,
    selector: &'a mut S,
    out: &'a mut W,
    stage: Stage,
    stopped_at: Option<Stage>,
}

impl<'a, A: PosApi, S: Selector, W: Write> Session<'a, A, S, W> {
    pub fn new(api: &'a mut A, selector: &'a mut S, out: &'a mut W) -> Self {
        Session {
            api,
            selector,
            out,
            stage: Stage::Start,
            stopped_at: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Last stage reached before a failed run jumped to [`Stage::End`].
    pub fn stopped_at(&self) -> Option<Stage> {
        self.stopped_at
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "{} -> {}", self.stage, next);
        debug!(from = %self.stage, to = %next, "stage");
        self.stage = next;
    }

    /// Ask with `prompt` and map the answer onto `ids`. A select-all over a
    /// listing where no entry has an id ends the run.
    fn choose(
        &mut self,
        what: &'static str,
        prompt: &str,
        ids: &[Option<String>],
    ) -> Result<Vec<String>, FlowError> {
        let answer = self.selector.read(prompt).map_err(FlowError::Input)?;
        let chosen = pick(ids, &answer).map_err(|source| FlowError::Selection { what, source })?;
        if chosen.is_empty() {
            return Err(FlowError::Empty("selectable ids"));
        }
        info!(what, count = chosen.len(), "selection made");
        Ok(chosen)
    }

    /// Drive the run to [`Stage::End`]. A failure at any step is logged and
    /// ends the run there; nothing is retried.
    pub fn run(&mut self, query: &Query) -> Result<Outcome, FlowError> {
        let result = self.steps(query);
        if let Err(e) = &result {
            error!(stage = %self.stage, "run stopped: {e}");
            self.stopped_at = Some(self.stage);
            self.stage = Stage::End;
        }
        result
    }

    fn steps(&mut self, query: &Query) -> Result<Outcome, FlowError> {
        self.api.authenticate(&query.api_login)?;
        self.advance(Stage::Authenticated);

        let orgs = self.api.organizations()?;
        if orgs.is_empty() {
            return Err(FlowError::Empty("organizations"));
        }
        self.advance(Stage::OrgsListed);
        write!(self.out, "{}", present::organization_menu(&orgs))?;
        let org_ids: Vec<Option<String>> = orgs.iter().map(|o| o.id.clone()).collect();
        let organization_ids = self.choose(
            "organization",
            "Organization numbers (comma-separated), or 0 for all",
            &org_ids,
        )?;
        writeln!(self.out, "\nSelected organization ids: {organization_ids:?}")?;
        self.advance(Stage::OrgsSelected);

        let groups = self.api.terminal_groups(&organization_ids)?;
        if groups.is_empty() {
            return Err(FlowError::Empty("terminal groups"));
        }
        self.advance(Stage::GroupsListed);
        write!(self.out, "{}", present::terminal_group_menu(&groups, &orgs))?;
        let group_ids: Vec<Option<String>> = groups.iter().map(|g| Some(g.id.clone())).collect();
        let terminal_group_ids = self.choose(
            "terminal group",
            "Terminal group numbers (comma-separated), or 0 for all",
            &group_ids,
        )?;
        writeln!(self.out, "\nSelected terminal group ids: {terminal_group_ids:?}")?;
        self.advance(Stage::GroupsSelected);

        let sections = self.api.restaurant_sections(&terminal_group_ids)?;
        if sections.is_empty() {
            return Err(FlowError::Empty("restaurant sections"));
        }
        let (menu, listed_tables) = present::table_menu(&sections);
        if listed_tables.is_empty() {
            return Err(FlowError::Empty("tables"));
        }
        self.advance(Stage::SectionsListed);
        write!(self.out, "{menu}")?;
        let table_ids = self.choose(
            "table",
            "Table numbers (e.g. 1,3,5), or 0 for all",
            &listed_tables,
        )?;
        writeln!(self.out, "\nSelected table ids: {table_ids:?}")?;
        self.advance(Stage::TablesSelected);

        let orders =
            self.api
                .orders_by_table(&organization_ids, &table_ids, &query.range, &query.statuses)?;
        if orders.is_empty() {
            return Err(FlowError::Empty("orders"));
        }
        self.advance(Stage::OrdersFetched);
        debug!(sample = %orders[0].raw(), "first order");
        write!(self.out, "{}", present::order_sample(&orders[0]))?;

        write!(self.out, "{}", present::orders(&orders))?;
        self.advance(Stage::Displayed);
        self.advance(Stage::End);

        Ok(Outcome {
            organization_ids,
            terminal_group_ids,
            table_ids,
            orders,
        })
    }
}
