pub mod dates;
pub mod flash;
pub mod page;
