//! bidtest - A/B hypothesis testing for bidding-strategy experiments
//!
//! Loads a two-sheet experiment workbook (control and test arms), describes
//! both arms, caps purchase outliers, merges the arms into one labeled
//! dataset, checks the normality and variance-homogeneity assumptions, and
//! runs the appropriate comparison test (independent t-test or Mann-Whitney
//! U) on the Purchase metric.

pub mod cli;
pub mod dataset;
pub mod describe;
pub mod experiment;
pub mod outliers;
pub mod stats;
