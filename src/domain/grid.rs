//! Three-by-three field of regions around the player, used to rank neighboring cells by bullet
//! density.
//!
//! Regions are addressed by their matrix index, 1 to 9 from top-left to bottom-right. Index 5 is
//! the player's own cell.

use std::fmt;

use super::{BoundingBox, Position};

pub const CENTER: usize = 5;

/// Weight of a neighbor's bullet count in a region's danger score.
pub const NEIGHBOR_WEIGHT: f64 = 0.5;

/// Fixed neighborhood of each region: the cells sharing an edge with it, plus the center for
/// every outer cell. The center itself only sees its four edge neighbors, so the table is not
/// symmetric.
const ADJACENCY: [&[usize]; 9] = [
    &[2, 4, 5],
    &[1, 3, 5],
    &[2, 5, 6],
    &[1, 5, 7],
    &[2, 4, 6, 8],
    &[3, 5, 9],
    &[4, 5, 8],
    &[5, 7, 9],
    &[5, 6, 8],
];

pub fn neighbors(index: usize) -> &'static [usize] {
    ADJACENCY.get(index.wrapping_sub(1)).copied().unwrap_or(&[])
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub index: usize,
    pub bbox: BoundingBox,
    pub bullet_count: u32,
    pub danger_score: f64,
}

impl Region {
    pub fn center(&self) -> Position {
        self.bbox.center()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    regions: [Region; 9],
}

impl Grid {
    /// Empty grid of `cell_size`-sided regions centered on `center`.
    pub fn around(center: Position, cell_size: i32) -> Self {
        let regions = std::array::from_fn(|i| {
            let (col, row) = ((i % 3) as i32 - 1, (i / 3) as i32 - 1);
            Region {
                index: i + 1,
                bbox: BoundingBox::from_center(
                    center.x() + col * cell_size,
                    center.y() + row * cell_size,
                    cell_size,
                    cell_size,
                ),
                bullet_count: 0,
                danger_score: 0.0,
            }
        });
        Self { regions }
    }

    /// Grid around `center` with bullet counts and danger scores filled in. A bullet straddling
    /// a cell boundary counts toward every region it overlaps.
    pub fn scan<'a>(
        center: Position,
        cell_size: i32,
        bullets: impl IntoIterator<Item = &'a BoundingBox>,
    ) -> Self {
        let mut grid = Self::around(center, cell_size);
        for bullet in bullets {
            for region in grid.regions.iter_mut() {
                if region.bbox.intersects(bullet) {
                    region.bullet_count += 1;
                }
            }
        }
        grid.update_danger_scores();
        grid
    }

    fn update_danger_scores(&mut self) {
        let counts = self.regions.map(|r| r.bullet_count as f64);
        for region in self.regions.iter_mut() {
            let spill: f64 = neighbors(region.index).iter().map(|n| counts[n - 1]).sum();
            region.danger_score = counts[region.index - 1] + NEIGHBOR_WEIGHT * spill;
        }
    }

    pub fn region(&self, index: usize) -> Option<&Region> {
        self.regions.get(index.wrapping_sub(1))
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Regions other than the player's own cell, in index order.
    pub fn candidates(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| r.index != CENTER)
    }

    pub fn locate(&self, position: Position) -> Option<&Region> {
        self.regions
            .iter()
            .find(|r| r.bbox.contains_position(position))
    }

    pub fn total_bullet_count(&self) -> u32 {
        self.regions.iter().map(|r| r.bullet_count).sum()
    }
}

impl fmt::Display for Grid {
    /// Bullet counts and danger scores laid out as the grid.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, regions) in self.regions.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            let cells = regions
                .iter()
                .map(|r| format!("{}:{:.1}", r.bullet_count, r.danger_score))
                .collect::<Vec<_>>();
            write!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::tests::square;

    #[test]
    fn test_grid_layout() {
        let grid = Grid::around(Position::new(500, 500), 200);
        let centers = grid
            .regions()
            .iter()
            .map(|r| (r.index, <(i32, i32)>::from(r.center())))
            .collect::<Vec<_>>();
        assert_eq!(
            centers,
            vec![
                (1, (300, 300)),
                (2, (500, 300)),
                (3, (700, 300)),
                (4, (300, 500)),
                (5, (500, 500)),
                (6, (700, 500)),
                (7, (300, 700)),
                (8, (500, 700)),
                (9, (700, 700)),
            ]
        );
        assert_eq!(
            grid.region(CENTER).map(|r| r.bbox),
            Some(BoundingBox::new(400, 400, 600, 600))
        );
    }

    #[test]
    fn test_adjacency_table() {
        let table = (1..=9).map(neighbors).collect::<Vec<_>>();
        assert_eq!(
            table,
            vec![
                &[2, 4, 5][..],
                &[1, 3, 5][..],
                &[2, 5, 6][..],
                &[1, 5, 7][..],
                &[2, 4, 6, 8][..],
                &[3, 5, 9][..],
                &[4, 5, 8][..],
                &[5, 7, 9][..],
                &[5, 6, 8][..],
            ]
        );
        assert!(neighbors(1).contains(&CENTER));
        assert!(!neighbors(CENTER).contains(&1));
        assert_eq!(neighbors(0), &[] as &[usize]);
        assert_eq!(neighbors(10), &[] as &[usize]);
    }

    #[test]
    fn test_bullets_inside_one_region_are_counted_once() {
        let bullets = [
            square(300, 300, 10),
            square(510, 320, 10),
            square(690, 690, 10),
            square(500, 500, 10),
        ];
        let grid = Grid::scan(Position::new(500, 500), 200, &bullets);
        assert_eq!(grid.total_bullet_count(), bullets.len() as u32);
    }

    #[rstest]
    #[case::vertical_edge(square(600, 500, 10), &[5, 6])]
    #[case::horizontal_edge(square(500, 400, 10), &[2, 5])]
    #[case::corner(square(400, 400, 10), &[1, 2, 4, 5])]
    #[case::touching_only(BoundingBox::new(600, 480, 610, 490), &[6])]
    fn test_straddling_bullet_counts_in_every_region(
        #[case] bullet: BoundingBox,
        #[case] expected: &[usize],
    ) {
        let grid = Grid::scan(Position::new(500, 500), 200, [&bullet]);
        let hit = grid
            .regions()
            .iter()
            .filter(|r| r.bullet_count > 0)
            .map(|r| r.index)
            .collect::<Vec<_>>();
        assert_eq!(hit, expected);
    }

    #[test]
    fn test_danger_scores_north_cluster() {
        let bullets = [
            square(480, 300, 10),
            square(500, 300, 10),
            square(520, 300, 10),
        ];
        let grid = Grid::scan(Position::new(500, 500), 200, &bullets);
        insta::assert_snapshot!(grid.to_string(), @r"
        0:1.5 3:3.0 0:1.5
        0:0.0 0:1.5 0:0.0
        0:0.0 0:0.0 0:0.0
        ");
    }

    #[test]
    fn test_danger_scores_center_and_corner() {
        let bullets = [square(500, 500, 10), square(300, 700, 10), square(300, 700, 10)];
        let grid = Grid::scan(Position::new(500, 500), 200, &bullets);
        insta::assert_snapshot!(grid.to_string(), @r"
        0:0.5 0:0.5 0:0.5
        0:1.5 1:1.0 0:0.5
        2:2.5 0:1.5 0:0.5
        ");
    }

    #[test]
    fn test_locate() {
        let grid = Grid::around(Position::new(500, 500), 200);
        assert_eq!(grid.locate(Position::new(500, 350)).map(|r| r.index), Some(2));
        assert_eq!(grid.locate(Position::new(600, 600)).map(|r| r.index), Some(9));
        assert_eq!(grid.locate(Position::new(399, 500)).map(|r| r.index), Some(4));
        assert_eq!(grid.locate(Position::new(1000, 500)), None);
    }

    #[test]
    fn test_candidates_skip_center() {
        let grid = Grid::around(Position::new(0, 0), 10);
        assert_eq!(
            grid.candidates().map(|r| r.index).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 6, 7, 8, 9]
        );
    }
}
