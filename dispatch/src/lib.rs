//! Sentence dispatcher for the parley command interpreter.
//!
//! This crate is the embeddable half of parley: given commands built from
//! [`parley-core`](parley_core) schemas, an [`App`] recognizes CLI
//! sentences, resolves them to a command, binds and validates their typed
//! inputs, invokes the handler, and routes the outcome to a single reply
//! sink owned by the host. It performs no I/O of its own.
//!
//! # Main entry points
//!
//! - [`App::is_cli_sentence`] — does this input belong to the app?
//! - [`App::parse`] — run the full pipeline for one sentence.
//! - [`Command::new`] / [`Command::with_callback`] — register handlers in
//!   the preferred or the legacy protocol.
//!
//! # Example
//!
//! ```
//! use parley_core::{ArgumentSpec, ValueKind};
//! use parley_dispatch::{App, Command, HandlerResult};
//!
//! # futures::executor::block_on(async {
//! let mut app: App<()> = App::new(
//!     "Test App",
//!     "An app that greets people",
//!     "/testapp",
//!     |msg, _ctx| println!("{msg}"),
//! );
//!
//! app.add_command(
//!     Command::new("greet", "Greets somebody", |argv, _ctx| {
//!         HandlerResult::message(format!("Hello, {}!", argv.args["name"]))
//!     })
//!     .unwrap()
//!     .arg(ArgumentSpec::required("name", "Who to greet", ValueKind::String).unwrap()),
//! );
//!
//! if app.is_cli_sentence("/testapp greet world") {
//!     app.parse("/testapp greet world", ()).await.unwrap();
//! }
//! # });
//! ```

pub mod app;
pub mod command;
mod help;
pub mod strings;
pub mod tokenize;

pub use app::{App, DispatchError};
pub use command::{Argv, Command, CompletionFn, HandlerError, HandlerReply, HandlerResult};
pub use strings::Strings;

// Schema types hosts need to declare commands.
pub use parley_core::{ArgumentSpec, FlagSpec, SchemaError, Validation, Value, ValueKind};
