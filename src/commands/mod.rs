pub mod synthesize;
