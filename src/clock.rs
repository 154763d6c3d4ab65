use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::info;

use crate::session::SharedGame;

pub fn tick_period(framerate: u32) -> Duration {
    Duration::from_secs(1) / framerate.max(1)
}

/// Advances the shared game's clock `framerate` times per second, forever.
///
/// Each tick adds one fixed period; the board ignores ticks unless a game
/// is in progress.
pub async fn start_clock_task(game: SharedGame, framerate: u32) {
    let period = tick_period(framerate);
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Started game clock: {} ticks per second", framerate.max(1));

    // The first tick completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        game.lock().await.board_mut().tick(period);
    }
}

#[cfg(test)]
mod tests {
    use minesweeper_common::{
        models::{Pos, Status},
        protocol::Command,
    };

    use super::*;
    use crate::{logic::Board, session::Game};

    #[test]
    fn period_divides_one_second() {
        assert_eq!(tick_period(60), Duration::from_secs(1) / 60);
        assert_eq!(tick_period(4), Duration::from_millis(250));
        assert_eq!(tick_period(0), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn clock_runs_only_while_playing() {
        let board = Board::with_layout(3, 1, &[Pos::new(0, 0)]).unwrap();
        let game = Game::from_board(board).shared();
        let clock = tokio::spawn(start_clock_task(game.clone(), 4));

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(game.lock().await.board().elapsed(), Duration::ZERO);

        game.lock()
            .await
            .apply(Command::Reveal { pos: Pos::new(1, 0) })
            .unwrap();
        time::sleep(Duration::from_millis(3100)).await;
        {
            let game = game.lock().await;
            assert_eq!(game.board().status(), Status::Playing);
            assert_eq!(game.board().elapsed_seconds(), 3);
        }

        game.lock()
            .await
            .apply(Command::Reveal { pos: Pos::new(0, 0) })
            .unwrap();
        let frozen = game.lock().await.board().elapsed();
        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(game.lock().await.board().elapsed(), frozen);

        clock.abort();
    }
}
