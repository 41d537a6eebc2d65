pub mod expand;
pub mod flatten;
pub mod generate;
pub mod inspect;
pub mod lint;
