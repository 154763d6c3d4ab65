//! Invariants that must hold for any board and any sequence of moves.

use minesweeper_board::{Board, CellView, Command, GameParams, Pos, Status};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

fn board(width: usize, height: usize, mines: usize, seed: u64) -> Board {
    Board::with_rng(
        GameParams {
            width,
            height,
            mines,
        },
        StdRng::seed_from_u64(seed),
    )
    .unwrap()
}

fn count(board: &Board, want: fn(&CellView) -> bool) -> usize {
    board.field().iter().flatten().filter(|v| want(v)).count()
}

fn count_mines(board: &Board) -> usize {
    (0..board.height())
        .flat_map(|y| (0..board.width()).map(move |x| Pos { x, y }))
        .filter(|&pos| board.cell(pos).unwrap().mine)
        .count()
}

fn dims() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..12, 1usize..12)
        .prop_filter("need room for at least one mine", |(w, h)| w * h >= 2)
        .prop_flat_map(|(w, h)| (Just(w), Just(h), 1..w * h))
}

fn command(width: usize, height: usize) -> impl Strategy<Value = Command> {
    (0..width, 0..height, 0u8..3).prop_map(|(x, y, kind)| {
        let pos = Pos { x, y };
        match kind {
            0 => Command::Reveal { pos },
            1 => Command::Flag { pos },
            _ => Command::Chord { pos },
        }
    })
}

fn apply(board: &mut Board, command: Command) {
    match command {
        Command::Reveal { pos } => board.reveal(pos).unwrap(),
        Command::Flag { pos } => board.flag(pos).unwrap(),
        Command::Chord { pos } => board.chord(pos).unwrap(),
        Command::Reset => board.reset(),
    }
}

#[test]
fn reset_after_a_finished_game_yields_a_clean_board() {
    let mut b = board(6, 6, 35, 99);
    b.reveal(Pos { x: 5, y: 5 }).unwrap();
    assert_eq!(b.status(), Status::Won);

    b.reset();

    assert_eq!(count(&b, |v| *v == CellView::Hidden), 36);
    assert_eq!(count_mines(&b), 0);
    assert_eq!(b.status(), Status::NotStarted);
    assert_eq!(b.elapsed_seconds(), 0);
}

proptest! {
    #[test]
    fn first_reveal_never_loses(
        (w, h, m) in dims(),
        seed in any::<u64>(),
        fx in 0usize..12,
        fy in 0usize..12,
    ) {
        let mut b = board(w, h, m, seed);
        let pos = Pos { x: fx % w, y: fy % h };

        b.reveal(pos).unwrap();

        prop_assert_ne!(b.status(), Status::Lost);
        prop_assert!(!b.cell(pos).unwrap().mine);
        prop_assert_eq!(count_mines(&b), m);
    }

    #[test]
    fn cell_states_partition_the_grid(
        (w, h, m) in dims(),
        seed in any::<u64>(),
        picks in prop::collection::vec((0usize..12, 0usize..12, 0u8..3), 1..60),
    ) {
        let mut b = board(w, h, m, seed);

        for (x, y, kind) in picks {
            let pos = Pos { x: x % w, y: y % h };
            let cmd = match kind {
                0 => Command::Reveal { pos },
                1 => Command::Flag { pos },
                _ => Command::Chord { pos },
            };
            apply(&mut b, cmd);

            let hidden = count(&b, |v| *v == CellView::Hidden);
            let flagged = count(&b, |v| *v == CellView::Flagged);
            let revealed = count(&b, |v| matches!(v, CellView::Revealed { .. } | CellView::Mine));
            prop_assert_eq!(hidden + flagged + revealed, w * h);
            prop_assert_eq!(flagged, b.flags_placed());
            prop_assert_eq!(revealed, b.revealed_count());
            prop_assert_eq!(b.mines_remaining(), m as i64 - flagged as i64);
            if b.mines_placed() {
                prop_assert_eq!(count_mines(&b), m);
            }
        }
    }

    #[test]
    fn adjacency_matches_literal_neighborhood(
        (w, h, m) in dims(),
        seed in any::<u64>(),
    ) {
        let mut b = board(w, h, m, seed);
        b.reveal(Pos { x: 0, y: 0 }).unwrap();

        for y in 0..h {
            for x in 0..w {
                let cell = b.cell(Pos { x, y }).unwrap();
                if cell.mine {
                    continue;
                }
                let mut mines = 0;
                for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                    for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                        if (nx, ny) != (x, y) && b.cell(Pos { x: nx, y: ny }).unwrap().mine {
                            mines += 1;
                        }
                    }
                }
                prop_assert_eq!(usize::from(cell.adjacent), mines);
            }
        }
    }

    #[test]
    fn flood_fill_reveals_exactly_the_zero_region_and_its_border(
        (w, h, m) in dims(),
        seed in any::<u64>(),
    ) {
        let mut b = board(w, h, m, seed);
        let start = Pos { x: w / 2, y: h / 2 };
        b.reveal(start).unwrap();

        // Expected region by breadth-first search over the final layout.
        let zero = |p: Pos| {
            let c = b.cell(p).unwrap();
            !c.mine && c.adjacent == 0
        };
        let mut expected = vec![vec![false; w]; h];
        let mut queue = std::collections::VecDeque::from([start]);
        expected[start.y][start.x] = true;
        while let Some(p) = queue.pop_front() {
            if !zero(p) {
                continue;
            }
            for ny in p.y.saturating_sub(1)..=(p.y + 1).min(h - 1) {
                for nx in p.x.saturating_sub(1)..=(p.x + 1).min(w - 1) {
                    if !expected[ny][nx] {
                        expected[ny][nx] = true;
                        queue.push_back(Pos { x: nx, y: ny });
                    }
                }
            }
        }

        let field = b.field();
        for y in 0..h {
            for x in 0..w {
                let revealed = matches!(field[y][x], CellView::Revealed { .. });
                let flagged_mine = b.status() == Status::Won && b.cell(Pos { x, y }).unwrap().mine;
                prop_assert_eq!(revealed, expected[y][x], "cell ({}, {})", x, y);
                if !expected[y][x] && !flagged_mine {
                    prop_assert_eq!(field[y][x], CellView::Hidden);
                }
            }
        }
    }

    #[test]
    fn double_flag_is_identity(
        (w, h, m) in dims(),
        seed in any::<u64>(),
        fx in 0usize..12,
        fy in 0usize..12,
    ) {
        let mut b = board(w, h, m, seed);
        b.reveal(Pos { x: 0, y: 0 }).unwrap();
        prop_assume!(b.status() == Status::Playing);

        let pos = Pos { x: fx % w, y: fy % h };
        let before = b.view(pos).unwrap();
        let flags = b.flags_placed();

        b.flag(pos).unwrap();
        b.flag(pos).unwrap();

        prop_assert_eq!(b.view(pos).unwrap(), before);
        prop_assert_eq!(b.flags_placed(), flags);
    }

    #[test]
    fn finished_games_stay_finished(
        (w, h, m, cmds) in dims().prop_flat_map(|(w, h, m)| {
            (Just(w), Just(h), Just(m), prop::collection::vec(command(w, h), 1..40))
        }),
        seed in any::<u64>(),
    ) {
        let mut b = board(w, h, m, seed);
        let mut finished = None;

        for cmd in cmds {
            apply(&mut b, cmd);

            if let Some(done) = finished {
                prop_assert_eq!(b.status(), done);
            } else if b.status().is_finished() {
                finished = Some(b.status());
            }
            if b.status() == Status::Won {
                prop_assert_eq!(b.mines_remaining(), 0);
                prop_assert_eq!(b.revealed_count(), w * h - m);
            }
        }
    }
}
