mod common;
mod reconcile;
mod robins;
