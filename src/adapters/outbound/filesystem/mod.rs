/// Filesystem adapters: the disk caches and the JSON result writer
mod disk_cache;
mod json_result_writer;

pub use disk_cache::{
    DiskCache, CACHE_VERSION, GRAPH_CACHE_FILE, MAX_AGE_DAYS, WAREHOUSE_CACHE_FILE,
};
pub use json_result_writer::JsonResultWriter;
