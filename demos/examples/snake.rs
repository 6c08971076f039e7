// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A snake walking a tile world.
//!
//! The world grid holds occupancy (walls, the snake body, the apple) and the
//! head's rotation overlay. A scene mirrors every occupied tile as a
//! grid-cell node so the frame can be hit tested and diffed into damage.
//!
//! Run:
//! - `cargo run -p trellis_demos --example snake`
//! - `RUST_LOG=debug cargo run -p trellis_demos --example snake` to see
//!   displaced occupants and empty-cell scans.

use std::collections::VecDeque;

use kurbo::Point;
use trellis_index::{MissingPolicy, Rect};
use trellis_layout::{Element, NodeId, Position, Size};
use trellis_scene::{LayerId, QueryFilter, Scene};
use trellis_world::{CellTransform, ElementId, GridPos, Rotation, WorldGrid};

const COLS: i32 = 14;
const ROWS: i32 = 9;
const TILE: i32 = 16;
const STEPS: usize = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Thing {
    Wall,
    Snake,
    Apple,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dir {
    Up,
    Right,
    Down,
    Left,
}

impl Dir {
    const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    fn step(self, p: GridPos) -> GridPos {
        match self {
            Self::Up => p.offset(0, -1),
            Self::Right => p.offset(1, 0),
            Self::Down => p.offset(0, 1),
            Self::Left => p.offset(-1, 0),
        }
    }

    fn rotation(self) -> Rotation {
        match self {
            Self::Up => Rotation::R0,
            Self::Right => Rotation::R90,
            Self::Down => Rotation::R180,
            Self::Left => Rotation::R270,
        }
    }
}

struct Game {
    grid: WorldGrid<Thing>,
    scene: Scene,
    world: LayerId,
    snake: ElementId,
    apple: ElementId,
    body: VecDeque<(GridPos, NodeId)>,
    apple_node: NodeId,
    spawned: usize,
    eaten: usize,
}

impl Game {
    fn new() -> Self {
        let mut grid = WorldGrid::with_seed(TILE, TILE, 7);
        let mut scene = Scene::new(Size::new(COLS * TILE, ROWS * TILE));
        let world = scene.add_stack_layer("world");

        let border: Vec<GridPos> = (0..COLS)
            .flat_map(|x| [GridPos::new(x, 0), GridPos::new(x, ROWS - 1)])
            .chain((1..ROWS - 1).flat_map(|y| [GridPos::new(0, y), GridPos::new(COLS - 1, y)]))
            .collect();
        grid.add_element_to_grid(Thing::Wall, border.iter().copied());
        for (i, &pos) in border.iter().enumerate() {
            let node = tile_node(&mut scene, world, &format!("wall{i}"));
            place(&mut scene, node, pos);
        }

        let start = [GridPos::new(4, 4), GridPos::new(3, 4), GridPos::new(2, 4)];
        let snake = grid.add_element_to_grid(Thing::Snake, start);
        let apple_pos = GridPos::new(9, 2);
        let apple = grid.add_element_to_grid(Thing::Apple, [apple_pos]);
        let apple_node = tile_node(&mut scene, world, "apple");
        place(&mut scene, apple_node, apple_pos);

        let mut game = Self {
            grid,
            scene,
            world,
            snake,
            apple,
            body: VecDeque::new(),
            apple_node,
            spawned: 0,
            eaten: 0,
        };
        for pos in start {
            let node = game.segment_node();
            place(&mut game.scene, node, pos);
            game.body.push_back((pos, node));
        }
        game
    }

    fn segment_node(&mut self) -> NodeId {
        self.spawned += 1;
        tile_node(&mut self.scene, self.world, &format!("segment{}", self.spawned))
    }

    fn head(&self) -> GridPos {
        self.body.front().map(|&(p, _)| p).unwrap_or_default()
    }

    fn apple_pos(&self) -> Option<GridPos> {
        self.grid.positions_of(self.apple).next()
    }

    /// Greedy steering: the free neighbor closest to the apple.
    fn choose(&self) -> Option<Dir> {
        let head = self.head();
        let target = self.apple_pos().unwrap_or(head);
        Dir::ALL
            .into_iter()
            .filter(|d| {
                !matches!(
                    self.grid.element_at(d.step(head)),
                    Some(Thing::Wall | Thing::Snake)
                )
            })
            .min_by_key(|d| {
                let p = d.step(head);
                (p.x - target.x).abs() + (p.y - target.y).abs()
            })
    }

    fn tick(&mut self) -> Result<bool, Box<dyn std::error::Error>> {
        let Some(dir) = self.choose() else {
            return Ok(false);
        };
        let old_head = self.head();
        let next = dir.step(old_head);

        if self.grid.get_element_at_grid_case(next) == Some(self.apple) {
            self.grid.remove_at_position(next, MissingPolicy::Error)?;
            self.grid.add_element_position(self.snake, next)?;
            self.eaten += 1;
            match self.grid.get_empty_case_in_range(1, COLS - 1, 1, ROWS - 1) {
                Some(spot) => {
                    self.grid.add_element_position(self.apple, spot)?;
                    place(&mut self.scene, self.apple_node, spot);
                }
                None => return Ok(false),
            }
            let node = self.segment_node();
            place(&mut self.scene, node, next);
            self.body.push_front((next, node));
        } else if let Some((tail, node)) = self.body.pop_back() {
            self.grid.move_element(self.snake, tail, next)?;
            place(&mut self.scene, node, next);
            self.body.push_front((next, node));
        }

        self.grid.clear_transform(old_head);
        self.grid.set_transform(
            next,
            CellTransform {
                rotation: dir.rotation(),
                ..CellTransform::default()
            },
        );
        Ok(true)
    }

    fn render(&self) -> Result<String, trellis_world::GridError> {
        let raster = self
            .grid
            .rasterize(Rect::new(0, 0, COLS, ROWS), '.', |thing, _| match thing {
                Thing::Wall => '#',
                Thing::Snake => 'o',
                Thing::Apple => '@',
            })?;
        let head = self.head();
        let mut out = String::new();
        for (row, cells) in raster.rows().enumerate() {
            for (col, &c) in cells.iter().enumerate() {
                let here = GridPos::new(col as i32, row as i32);
                if here == head {
                    let facing = self
                        .grid
                        .transform_at(here)
                        .map_or(Rotation::R0, |t| t.rotation);
                    out.push(match facing {
                        Rotation::R0 => '^',
                        Rotation::R90 => '>',
                        Rotation::R180 => 'v',
                        Rotation::R270 => '<',
                    });
                } else {
                    out.push(c);
                }
            }
            out.push('\n');
        }
        Ok(out)
    }
}

fn tile_node(scene: &mut Scene, layer: LayerId, name: &str) -> NodeId {
    scene
        .add_element(layer, None, Element::leaf(name, Position::grid_cell(TILE, TILE)))
        .expect("tile names are unique")
}

fn place(scene: &mut Scene, node: NodeId, pos: GridPos) {
    scene
        .layout_mut()
        .place_on_cell(node, pos.x, pos.y)
        .expect("tile nodes sit on grid cells");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut game = Game::new();
    game.scene.commit();
    println!("{}", game.render()?);

    for step in 1..=STEPS {
        if !game.tick()? {
            println!("stuck after {step} steps");
            break;
        }
        let damage = game.scene.commit();
        log::info!(
            "step {step}: {} dirty rects, union {:?}",
            damage.dirty_rects.len(),
            damage.union_rect()
        );
    }

    println!("{}", game.render()?);
    let head = game.head();
    let cell = game.grid.cell_rect(head);
    let center = Point::new(
        f64::from(cell.x) + f64::from(TILE) / 2.0,
        f64::from(cell.y) + f64::from(TILE) / 2.0,
    );
    let hit = game.scene.hit_test(center, QueryFilter::new().pickable());
    let name = hit.and_then(|id| game.scene.layout().name_of(id));
    println!(
        "ate {} apples, length {}, head at {:?} is node {:?}",
        game.eaten,
        game.body.len(),
        head,
        name
    );
    Ok(())
}
