#[cfg(test)]
mod tests {
    use crate::{
        new_game, Category, GameState, HeldMask, Player, PlayerKind, Rules, TurnPhase, TurnState,
        ROLLS_PER_TURN,
    };

    fn three_seats() -> GameState {
        new_game(
            vec![
                Player::new("Player 1", PlayerKind::Human),
                Player::new("Player 2", PlayerKind::Human),
                Player::new("Botzee", PlayerKind::Bot),
            ],
            Rules::default(),
        )
    }

    #[test]
    fn fresh_turn_state() {
        let t = TurnState::fresh(2);
        assert_eq!(t.active_player, 2);
        assert_eq!(t.rolls_remaining, ROLLS_PER_TURN);
        assert_eq!(t.dice, None);
        assert_eq!(t.held, HeldMask::NONE);
        assert_eq!(t.phase(), TurnPhase::AwaitingFirstRoll);
        assert_eq!(t.rolls_used(), 0);
    }

    #[test]
    fn phases_follow_dice_and_rolls() {
        let mut t = TurnState::fresh(0);
        t.dice = Some([1, 2, 3, 4, 5]);
        t.rolls_remaining = 2;
        assert_eq!(t.phase(), TurnPhase::Rolling);
        assert_eq!(t.rolls_used(), 1);
        t.rolls_remaining = 0;
        assert_eq!(t.phase(), TurnPhase::AwaitingCategoryChoice);
    }

    #[test]
    fn new_game_is_empty() {
        let s = three_seats();
        assert_eq!(s.players.len(), 3);
        assert_eq!(s.turn, TurnState::fresh(0));
        for p in &s.players {
            assert_eq!(p.scorecard.open_categories().count(), 13);
        }
        assert_eq!(s.active_player().name, "Player 1");
    }

    #[test]
    fn next_player_wraps() {
        let s = three_seats();
        assert_eq!(s.next_player(0), 1);
        assert_eq!(s.next_player(1), 2);
        assert_eq!(s.next_player(2), 0);
    }

    #[test]
    fn rotate_seats_keeps_cards_and_resets_turn() {
        let mut s = three_seats();
        s.players[1].scorecard.record(Category::Chance, 17).unwrap();
        s.turn.active_player = 2;
        s.turn.dice = Some([6, 6, 6, 6, 6]);

        let r = s.rotate_seats(1);
        let names: Vec<&str> = r.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Player 2", "Botzee", "Player 1"]);
        assert_eq!(r.players[0].scorecard.get(Category::Chance), Some(17));
        assert_eq!(r.turn, TurnState::fresh(0));
        assert_eq!(r.rules, s.rules);
    }

    #[test]
    fn seat_helpers_tolerate_no_players() {
        let s = GameState {
            players: Vec::new(),
            turn: TurnState::fresh(0),
            rules: Rules::default(),
        };
        assert_eq!(s.next_player(0), 0);
        let r = s.rotate_seats(3);
        assert!(r.players.is_empty());
        assert_eq!(r.turn, TurnState::fresh(0));
    }

    #[test]
    fn serialized_names_are_snake_case() {
        let v = serde_yaml::to_string(&PlayerKind::Bot).unwrap();
        assert_eq!(v.trim(), "bot");
        let c: Category = serde_yaml::from_str("full_house").unwrap();
        assert_eq!(c, Category::FullHouse);
    }
}
