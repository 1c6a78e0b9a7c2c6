//! Level grids: decoded tile codes laid out by row and column.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tile codes as authored in level data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileCode {
    Empty,
    Ground,
    Panel,
    Enemy,
    PlayerSpawn,
    Grass,
    Brick,
}

impl TileCode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Ground),
            2 => Some(Self::Panel),
            3 => Some(Self::Enemy),
            4 => Some(Self::PlayerSpawn),
            5 => Some(Self::Grass),
            6 => Some(Self::Brick),
            _ => None,
        }
    }
}

/// Rectangular tile grid with exactly one player spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGrid {
    pub level_id: String,
    rows: Vec<Vec<TileCode>>,
}

impl LevelGrid {
    pub fn from_codes(level_id: &str, codes: &[Vec<u8>]) -> Result<Self, String> {
        if codes.is_empty() || codes[0].is_empty() {
            return Err("Level validation failed: grid is empty".to_string());
        }
        let width = codes[0].len();

        let mut rows = Vec::with_capacity(codes.len());
        let mut player_spawns = 0;
        for (r, row) in codes.iter().enumerate() {
            if row.len() != width {
                return Err(format!(
                    "Level validation failed: row {} has {} columns, expected {}",
                    r,
                    row.len(),
                    width
                ));
            }
            let mut tiles = Vec::with_capacity(width);
            for (c, &code) in row.iter().enumerate() {
                let tile = TileCode::from_code(code).ok_or_else(|| {
                    format!(
                        "Level validation failed: unknown tile code {} at ({}, {})",
                        code, r, c
                    )
                })?;
                if tile == TileCode::PlayerSpawn {
                    player_spawns += 1;
                }
                tiles.push(tile);
            }
            rows.push(tiles);
        }

        if player_spawns != 1 {
            return Err(format!(
                "Level validation failed: expected exactly one player spawn, found {}",
                player_spawns
            ));
        }

        Ok(Self {
            level_id: level_id.to_string(),
            rows,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows[0].len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<TileCode> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Every non-empty tile as `(row, col, code)`, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, TileCode)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, &tile)| tile != TileCode::Empty)
                .map(move |(c, &tile)| (r, c, tile))
        })
    }

    /// The 5x50 stage the game ships with.
    pub fn demo() -> Self {
        const DEMO_ROWS: [&str; 5] = [
            "00000000000000000000000000000000000000000000000000",
            "00400000000000000000002000000000000000000000000000",
            "00200000022000000000002000000000000000000000000000",
            "02200000222220002020022000000000000000000000000000",
            "11111111111111111111111000000000000000000000000000",
        ];
        let codes: Vec<Vec<u8>> = DEMO_ROWS
            .iter()
            .map(|row| row.bytes().map(|b| b - b'0').collect())
            .collect();
        match Self::from_codes("demo", &codes) {
            Ok(level) => level,
            Err(err) => panic!("built-in demo level is invalid: {err}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LevelFileJson {
    version: String,
    level_id: String,
    rows: Vec<Vec<u8>>,
}

pub fn load_level_from_path(path: &Path) -> Result<LevelGrid, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_level(&raw).map_err(|e| format!("Level {}: {e}", path.display()))
}

pub fn parse_level(raw: &str) -> Result<LevelGrid, String> {
    let file: LevelFileJson =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse level JSON: {e}"))?;
    if file.version != "0.1" {
        return Err(format!(
            "Level validation failed: unsupported version '{}'",
            file.version
        ));
    }
    if file.level_id.is_empty() {
        return Err("Level validation failed: level_id is empty".to_string());
    }
    LevelGrid::from_codes(&file.level_id, &file.rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "gr_level_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn demo_level_has_expected_shape() {
        let level = LevelGrid::demo();
        assert_eq!(level.row_count(), 5);
        assert_eq!(level.col_count(), 50);
        assert_eq!(level.get(1, 2), Some(TileCode::PlayerSpawn));
        assert_eq!(level.get(4, 0), Some(TileCode::Ground));
        assert_eq!(level.get(4, 23), Some(TileCode::Empty));
        let ground = level.tiles().filter(|t| t.2 == TileCode::Ground).count();
        assert_eq!(ground, 23);
    }

    #[test]
    fn tiles_skip_empty_cells() {
        let level = LevelGrid::from_codes("t", &[vec![0, 4, 0], vec![1, 0, 6]]).expect("valid");
        let tiles: Vec<_> = level.tiles().collect();
        assert_eq!(
            tiles,
            vec![
                (0, 1, TileCode::PlayerSpawn),
                (1, 0, TileCode::Ground),
                (1, 2, TileCode::Brick)
            ]
        );
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = LevelGrid::from_codes("t", &[vec![4, 0, 0], vec![1, 1]]).expect_err("ragged");
        assert!(err.contains("row 1 has 2 columns"));
    }

    #[test]
    fn rejects_unknown_codes() {
        let err = LevelGrid::from_codes("t", &[vec![4, 9]]).expect_err("unknown code");
        assert!(err.contains("unknown tile code 9"));
    }

    #[test]
    fn rejects_missing_or_extra_player() {
        let err = LevelGrid::from_codes("t", &[vec![1, 1]]).expect_err("no player");
        assert!(err.contains("found 0"));
        let err = LevelGrid::from_codes("t", &[vec![4, 4]]).expect_err("two players");
        assert!(err.contains("found 2"));
    }

    #[test]
    fn rejects_empty_grid() {
        let err = LevelGrid::from_codes("t", &[]).expect_err("empty");
        assert!(err.contains("grid is empty"));
    }

    #[test]
    fn load_level_from_disk() {
        let path = temp_file_path("valid");
        fs::write(
            &path,
            r#"{ "version": "0.1", "level_id": "strip", "rows": [[0,4,0],[1,1,1]] }"#,
        )
        .expect("write temp file");
        let level = load_level_from_path(&path).expect("level should load");
        assert_eq!(level.level_id, "strip");
        assert_eq!(level.row_count(), 2);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn parse_level_rejects_bad_version() {
        let err = parse_level(r#"{ "version": "2", "level_id": "x", "rows": [[4]] }"#)
            .expect_err("bad version");
        assert!(err.contains("unsupported version"));
    }

    #[test]
    fn shipped_demo_file_matches_builtin() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/levels/demo.json");
        let level = load_level_from_path(&path).expect("shipped level should load");
        assert_eq!(level, LevelGrid::demo());
    }
}
