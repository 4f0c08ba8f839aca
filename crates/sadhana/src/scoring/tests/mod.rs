mod buckets;
mod common;
