pub mod reconstruction;
