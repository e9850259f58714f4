// Shop integration tests
// Exchange, collectible pool, owner withdrawal and atomic rollback

mod atomicity_test;
mod collectible_test;
