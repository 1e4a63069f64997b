/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
///
/// One enum covers both regions: the underground-only kinds (Wall, the
/// inverted pipe mouths, the mossy/cracked floor variants) carry their own
/// glyphs but collapse to the shared behaviors below, so there is no
/// separate "display" strip to keep in sync.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Ground,          // ⠤
    GroundMossy,     // ⠻  underground floor variant, behaves as Ground
    GroundCracked,   // ⠽  underground floor variant, behaves as Ground
    Hole,            // _  fatal to stand on
    Pipe,            // ⠶  upright pipe, blocks grounded entry
    InvertedPipe,    // ⠭  ceiling pipe mouth, walk-through
    InvertedPipeAlt, // ⠯  ceiling pipe mouth, walk-through
    Coin,            // ⠥  collected by jumping from directly beneath
    Flag,            // ⚑  level goal
    Wall,            // ⠿  underground only, blocks grounded entry
    EnemyMarker,     // o  placeholder in level data, cleared at scan time
}

impl Tile {
    /// Parse one level-data glyph. Unknown glyphs degrade to Ground so a
    /// malformed strip stays traversable.
    pub fn from_char(ch: char) -> Tile {
        match ch {
            '⠤' => Tile::Ground,
            '⠻' => Tile::GroundMossy,
            '⠽' => Tile::GroundCracked,
            '_' => Tile::Hole,
            '⠶' => Tile::Pipe,
            '⠭' => Tile::InvertedPipe,
            '⠯' => Tile::InvertedPipeAlt,
            '⠥' => Tile::Coin,
            '⚑' => Tile::Flag,
            '⠿' => Tile::Wall,
            'o' => Tile::EnemyMarker,
            _ => Tile::Ground,
        }
    }

    /// The glyph shown for this tile when nothing stands on it.
    pub fn glyph(self) -> char {
        match self {
            Tile::Ground => '⠤',
            Tile::GroundMossy => '⠻',
            Tile::GroundCracked => '⠽',
            Tile::Hole => '_',
            Tile::Pipe => '⠶',
            Tile::InvertedPipe => '⠭',
            Tile::InvertedPipeAlt => '⠯',
            Tile::Coin => '⠥',
            Tile::Flag => '⚑',
            Tile::Wall => '⠿',
            Tile::EnemyMarker => 'o',
        }
    }

    /// Any pipe kind: upright or one of the inverted mouths.
    /// Standing on one of these exempts the player from the pipe-face
    /// block, and patrol agents turn around at all of them.
    pub fn is_pipe_like(self) -> bool {
        matches!(self, Tile::Pipe | Tile::InvertedPipe | Tile::InvertedPipeAlt)
    }

    /// Inverted (ceiling) pipe mouths only. Walk-through on the ground;
    /// the last one in an underground strip is the exit trigger.
    pub fn is_inverted_pipe(self) -> bool {
        matches!(self, Tile::InvertedPipe | Tile::InvertedPipeAlt)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Ground
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_round_trip() {
        for t in [
            Tile::Ground,
            Tile::GroundMossy,
            Tile::GroundCracked,
            Tile::Hole,
            Tile::Pipe,
            Tile::InvertedPipe,
            Tile::InvertedPipeAlt,
            Tile::Coin,
            Tile::Flag,
            Tile::Wall,
            Tile::EnemyMarker,
        ] {
            assert_eq!(Tile::from_char(t.glyph()), t);
        }
    }

    #[test]
    fn unknown_glyph_degrades_to_ground() {
        assert_eq!(Tile::from_char('x'), Tile::Ground);
        assert_eq!(Tile::from_char(' '), Tile::Ground);
        assert_eq!(Tile::from_char('⣿'), Tile::Ground);
    }

    #[test]
    fn pipe_families() {
        assert!(Tile::Pipe.is_pipe_like());
        assert!(Tile::InvertedPipe.is_pipe_like());
        assert!(Tile::InvertedPipeAlt.is_pipe_like());
        assert!(!Tile::Pipe.is_inverted_pipe());
        assert!(Tile::InvertedPipe.is_inverted_pipe());
        assert!(Tile::InvertedPipeAlt.is_inverted_pipe());
        assert!(!Tile::Wall.is_pipe_like());
        assert!(!Tile::Ground.is_pipe_like());
    }
}
