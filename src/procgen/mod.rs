//! Pure geometry generators. Randomness always comes in through a [`crate::RandomSource`].

pub mod disk;
pub mod ridge;
pub mod ring;
