pub mod config;
pub mod console;
pub mod external;
pub mod locator;
pub mod report;
