pub mod collect;
pub mod enrich;

#[cfg(test)]
pub mod testing;
