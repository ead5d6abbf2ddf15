mod address;
mod company;
mod history;
pub mod legacy;

pub use address::*;
pub use company::*;
pub use history::*;

#[cfg(test)]
pub(crate) use company::tests::sample_draft;
