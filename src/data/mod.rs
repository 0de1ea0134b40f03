pub mod roster;

pub use roster::{
    builtin_critters, demo_config, demo_state, enemy_lineup, load_roster, Difficulty,
};
