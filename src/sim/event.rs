/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and score keeping.

#[derive(Clone, Debug, PartialEq)]
#[allow(dead_code)]
pub enum GameEvent {
    Jumped,
    CoinCollected,
    EnemyStomped { idx: usize },
    PipeEntered,
    PipeExited,
    PlayerDied { cause: DeathCause },
    StageCleared,
    NewHighScore { coins: u32 },
}

/// What ended the run. Timer expiry is reported here too so the sound
/// layer can treat it like any other death.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathCause {
    Enemy,
    Hole,
    TimeUp,
}
