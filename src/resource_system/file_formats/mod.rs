pub mod levelfile;
