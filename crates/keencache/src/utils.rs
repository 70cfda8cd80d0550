pub mod byte_order;
pub mod data_file;
pub mod files;
pub mod mem_reader;
