//! TUI building blocks: the listing, the registration form, the navigation
//! bar, and the modal dialogs composed by [`crate::app::App`].

pub mod dialogs;
pub mod form;
pub mod keybindings;
pub mod listing;
pub mod navbar;
mod panels;

pub use dialogs::{ConfirmDialog, HelpDialog, PendingDelete};
pub use form::{FormMode, RegistrationForm};
pub use listing::Listing;
pub use navbar::NavBar;
pub use panels::{HeaderBar, OverviewPanel, StatusBar};
