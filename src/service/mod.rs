pub mod editor;
pub mod fetcher;
pub mod loader;
pub mod synchronizer;

#[cfg(test)]
pub mod testing;
