pub mod colors;
pub mod fasta;
pub mod ms;
pub mod sfs;
