pub mod backup;
pub mod edit;
pub mod menu;
pub mod prompt;
pub mod session;
pub mod show;
pub mod view;
