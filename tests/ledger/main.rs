// Ledger integration tests
// Fungible and collectible ledgers and the mint gate

mod access_test;
mod collectible_test;
