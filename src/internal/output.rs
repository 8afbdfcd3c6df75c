pub mod positional_file;
