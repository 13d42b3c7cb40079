//! Headless $OMNOM arcade loop: the shiba roams a grid eating dogs.
//!
//! Frames are drawn as ASCII to stdout at a fixed tick; a greedy autopilot
//! stands in for keyboard input.

use rand::{rngs::StdRng, seq::IndexedRandom, SeedableRng};
use std::collections::VecDeque;
use std::time::Duration;

const GRID_WIDTH: i32 = 40;
const GRID_HEIGHT: i32 = 30;
const DOG_COUNT: usize = 5;
const DEFAULT_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    fn distance(self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tick {
    Moved,
    Ate,
    GameOver,
}

struct ShibaGame<R> {
    width: i32,
    height: i32,
    /// Head first.
    body: VecDeque<Cell>,
    direction: Direction,
    dogs: Vec<Cell>,
    score: u32,
    rng: R,
}

impl<R: rand::Rng> ShibaGame<R> {
    fn new(width: i32, height: i32, rng: R) -> Self {
        let mut game = Self {
            width,
            height,
            body: VecDeque::from([Cell {
                x: width / 2,
                y: height / 2,
            }]),
            direction: Direction::Right,
            dogs: Vec::new(),
            score: 0,
            rng,
        };
        game.replenish_dogs();
        game
    }

    fn head(&self) -> Cell {
        self.body[0]
    }

    /// Exact reversals are ignored; they would bite the neck immediately.
    fn turn(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            return false;
        }
        self.direction = direction;
        true
    }

    fn step_from_head(&self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        let head = self.head();
        Cell {
            x: head.x + dx,
            y: head.y + dy,
        }
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// The tail cell is free: it is vacated on the same tick.
    fn is_blocked(&self, cell: Cell) -> bool {
        !self.in_bounds(cell)
            || self
                .body
                .iter()
                .take(self.body.len().saturating_sub(1))
                .any(|segment| *segment == cell)
    }

    fn tick(&mut self) -> Tick {
        let new_head = self.step_from_head(self.direction);
        if self.is_blocked(new_head) {
            return Tick::GameOver;
        }

        self.body.push_front(new_head);

        if let Some(index) = self.dogs.iter().position(|dog| *dog == new_head) {
            self.score += 1;
            self.dogs.swap_remove(index);
            self.replenish_dogs();
            Tick::Ate
        } else {
            self.body.pop_back();
            Tick::Moved
        }
    }

    /// Top the dogs back up on cells holding neither a dog nor the shiba.
    fn replenish_dogs(&mut self) {
        let mut free: Vec<Cell> = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Cell { x, y }))
            .filter(|cell| !self.body.contains(cell) && !self.dogs.contains(cell))
            .collect();

        while self.dogs.len() < DOG_COUNT {
            let Some(&cell) = free.choose(&mut self.rng) else {
                break;
            };
            free.retain(|candidate| *candidate != cell);
            self.dogs.push(cell);
        }
    }

    /// Greedy pick: the safe direction closest to any dog.
    fn autopilot(&self) -> Direction {
        Direction::ALL
            .into_iter()
            .filter(|direction| *direction != self.direction.opposite())
            .filter(|direction| !self.is_blocked(self.step_from_head(*direction)))
            .min_by_key(|direction| {
                let next = self.step_from_head(*direction);
                self.dogs
                    .iter()
                    .map(|dog| next.distance(*dog))
                    .min()
                    .unwrap_or(0)
            })
            .unwrap_or(self.direction)
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(((self.width + 3) * (self.height + 3)) as usize);
        out.push_str(&format!("$OMNOM: {}\n", self.score));
        let border = format!("+{}+\n", "-".repeat(self.width as usize));
        out.push_str(&border);
        for y in 0..self.height {
            out.push('|');
            for x in 0..self.width {
                let cell = Cell { x, y };
                let glyph = if cell == self.head() {
                    '@'
                } else if self.body.contains(&cell) {
                    'o'
                } else if self.dogs.contains(&cell) {
                    'd'
                } else {
                    ' '
                };
                out.push(glyph);
            }
            out.push_str("|\n");
        }
        out.push_str(&border);
        out
    }
}

struct Options {
    max_ticks: Option<u64>,
    seed: Option<u64>,
    delay: Duration,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        max_ticks: None,
        seed: None,
        delay: Duration::from_millis(DEFAULT_DELAY_MS),
    };

    let mut iter = args.iter().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = |name: &str| -> Result<u64, String> {
            let raw = iter
                .next()
                .ok_or_else(|| format!("{name} requires a value"))?;
            raw.parse::<u64>()
                .map_err(|e| format!("invalid {name} value {raw}: {e}"))
        };
        match flag.as_str() {
            "--ticks" => options.max_ticks = Some(value("--ticks")?),
            "--seed" => options.seed = Some(value("--seed")?),
            "--delay-ms" => options.delay = Duration::from_millis(value("--delay-ms")?),
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(options)
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("usage: omnom_arcade [--ticks N] [--seed S] [--delay-ms D]");
            std::process::exit(1);
        }
    };

    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut game = ShibaGame::new(GRID_WIDTH, GRID_HEIGHT, rng);

    let mut ticks = 0u64;
    loop {
        if options.max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }
        let direction = game.autopilot();
        game.turn(direction);
        if game.tick() == Tick::GameOver {
            break;
        }
        ticks += 1;

        print!("\x1b[2J\x1b[H{}", game.render());
        std::thread::sleep(options.delay);
    }

    println!("GAME OVER");
    println!("$OMNOM Tokens: {}", game.score);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_with(body: &[(i32, i32)], direction: Direction, dogs: &[(i32, i32)]) -> ShibaGame<StdRng> {
        let mut game = ShibaGame::new(10, 10, StdRng::seed_from_u64(1));
        game.body = body.iter().map(|&(x, y)| Cell { x, y }).collect();
        game.direction = direction;
        game.dogs = dogs.iter().map(|&(x, y)| Cell { x, y }).collect();
        game
    }

    #[test]
    fn new_game_spawns_dogs_off_the_shiba() {
        let game = ShibaGame::new(GRID_WIDTH, GRID_HEIGHT, StdRng::seed_from_u64(42));
        assert_eq!(game.dogs.len(), DOG_COUNT);
        assert!(!game.dogs.contains(&game.head()));
        for (i, dog) in game.dogs.iter().enumerate() {
            assert!(!game.dogs[i + 1..].contains(dog));
        }
    }

    #[test]
    fn moving_keeps_length() {
        let mut game = game_with(&[(2, 2), (1, 2), (0, 2)], Direction::Right, &[(9, 9)]);
        assert_eq!(game.tick(), Tick::Moved);
        let body: Vec<Cell> = game.body.iter().copied().collect();
        assert_eq!(
            body,
            vec![Cell { x: 3, y: 2 }, Cell { x: 2, y: 2 }, Cell { x: 1, y: 2 }]
        );
        assert_eq!(game.score, 0);
    }

    #[test]
    fn eating_grows_scores_and_replenishes() {
        let mut game = game_with(&[(2, 2), (1, 2)], Direction::Right, &[(3, 2), (8, 8)]);
        assert_eq!(game.tick(), Tick::Ate);
        assert_eq!(game.score, 1);
        assert_eq!(game.body.len(), 3);
        assert_eq!(game.dogs.len(), DOG_COUNT);
        assert!(!game.dogs.contains(&Cell { x: 3, y: 2 }));
        assert!(game.dogs.contains(&Cell { x: 8, y: 8 }));
        for dog in &game.dogs {
            assert!(!game.body.contains(dog));
        }
    }

    #[test]
    fn leaving_the_grid_ends_the_game() {
        let mut game = game_with(&[(9, 0)], Direction::Right, &[]);
        assert_eq!(game.tick(), Tick::GameOver);

        let mut game = game_with(&[(0, 0)], Direction::Up, &[]);
        assert_eq!(game.tick(), Tick::GameOver);
    }

    #[test]
    fn biting_the_body_ends_the_game() {
        // head at (2,2) moving up into (2,1), which is not the tail
        let body = [(2, 2), (3, 2), (3, 1), (2, 1), (1, 1)];
        let mut game = game_with(&body, Direction::Up, &[]);
        assert_eq!(game.tick(), Tick::GameOver);
    }

    #[test]
    fn chasing_the_tail_is_allowed() {
        // square loop: the next cell is the tail, which moves away this tick
        let body = [(1, 1), (2, 1), (2, 2), (1, 2)];
        let mut game = game_with(&body, Direction::Down, &[(9, 9)]);
        assert_eq!(game.tick(), Tick::Moved);
        assert_eq!(game.head(), Cell { x: 1, y: 2 });
        assert_eq!(game.body.len(), 4);
    }

    #[test]
    fn reversing_is_rejected() {
        let mut game = game_with(&[(2, 2), (1, 2)], Direction::Right, &[]);
        assert!(!game.turn(Direction::Left));
        assert_eq!(game.direction, Direction::Right);
        assert!(game.turn(Direction::Up));
        assert_eq!(game.direction, Direction::Up);
        assert!(!game.turn(Direction::Down));
    }

    #[test]
    fn replenish_stops_when_board_is_full() {
        let mut game = ShibaGame::new(2, 1, StdRng::seed_from_u64(3));
        assert_eq!(game.dogs.len(), 1);
        game.replenish_dogs();
        assert_eq!(game.dogs.len(), 1);
    }

    #[test]
    fn autopilot_heads_for_dogs_and_never_reverses() {
        let game = game_with(&[(5, 5), (4, 5)], Direction::Right, &[(5, 0)]);
        assert_eq!(game.autopilot(), Direction::Up);

        let game = game_with(&[(5, 5), (6, 5)], Direction::Left, &[(9, 5)]);
        assert_ne!(game.autopilot(), Direction::Right);
    }

    #[test]
    fn autoplay_runs_until_game_over_or_limit() {
        let mut game = ShibaGame::new(GRID_WIDTH, GRID_HEIGHT, StdRng::seed_from_u64(9));
        for _ in 0..500 {
            let direction = game.autopilot();
            game.turn(direction);
            if game.tick() == Tick::GameOver {
                break;
            }
        }
        assert_eq!(game.body.len() as u32, game.score + 1);
    }

    #[test]
    fn render_marks_head_body_and_dogs() {
        let game = game_with(&[(1, 0), (0, 0)], Direction::Right, &[(3, 0)]);
        let frame = game.render();
        assert!(frame.starts_with("$OMNOM: 0\n"));
        assert!(frame.contains("|o@ d      |"));
    }

    #[test]
    fn parse_args_reads_flags() {
        let args: Vec<String> = ["omnom_arcade", "--ticks", "5", "--seed", "7", "--delay-ms", "0"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let options = parse_args(&args).unwrap();
        assert_eq!(options.max_ticks, Some(5));
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.delay, Duration::ZERO);

        let bad: Vec<String> = vec!["omnom_arcade".to_string(), "--ticks".to_string()];
        assert!(parse_args(&bad).is_err());
    }
}
