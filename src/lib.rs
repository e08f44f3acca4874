// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive tool.
//
// Module responsibilities:
// - `api`: one blocking call per POS cloud endpoint, behind the `PosApi`
//   trait.
// - `models`: read-only views over the API responses.
// - `selection`: parses menu answers and abstracts where they come from.
// - `present`: renders menus and orders as text.
// - `flow`: the forward-only state machine that ties the steps together.
// - `config`, `logging`, `error`: startup configuration, the log sink and
//   the error taxonomy.
pub mod api;
pub mod config;
pub mod error;
pub mod flow;
pub mod logging;
pub mod models;
pub mod present;
pub mod selection;
