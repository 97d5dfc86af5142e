pub mod bootstrap;
pub mod game;
pub mod map_select;
pub mod menu;
pub mod session;
pub mod state;
