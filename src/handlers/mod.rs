// Handlers grouped by access tier: public (no principal), protected (any
// signed-in user), elevated (admin role).
pub mod elevated;
pub mod protected;
pub mod public;
