pub mod connection;

pub use connection::connect_to_target_window;
