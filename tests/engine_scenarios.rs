//! End-to-end rule scenarios driven through the public
//! enumerate/execute pipeline.

use tussle_rs::core::{Card, CardCategory, CardId, PlayerId, Stat, CC_CAP};
use tussle_rs::game::{enumerate_legal_actions, execute, Candidate, GameState, Phase};
use tussle_rs::stats;
use tussle_rs::zones::Zone;
use tussle_rs::TussleError;

fn two_player_in_main() -> (GameState, PlayerId, PlayerId) {
    let mut game = GameState::new_two_player("P1".to_string(), "P2".to_string());
    game.turn.phase = Phase::Main;
    let p1 = game.players[0].id;
    let p2 = game.players[1].id;
    (game, p1, p2)
}

fn add_card(
    game: &mut GameState,
    owner: PlayerId,
    name: &str,
    zone: Zone,
    (speed, strength, stamina): (i32, i32, i32),
) -> CardId {
    let id = game.cards.next_id();
    let mut card = Card::new(id, name.to_string(), owner);
    card.base_speed = speed;
    card.base_strength = strength;
    card.base_stamina = stamina;
    card.current_stamina = stamina;
    card.zone = zone;
    game.cards.insert(id, card);
    game.zones_mut(owner).unwrap().get_zone_mut(zone).add(id);
    id
}

fn find_tussle(game: &GameState, player: PlayerId, attacker: CardId) -> Option<Candidate> {
    enumerate_legal_actions(game, player)
        .unwrap()
        .into_iter()
        .find(|c| matches!(c, Candidate::Tussle { attacker: a, .. } if *a == attacker))
}

#[test]
fn unopposed_strike_forces_a_hand_card_out() {
    let (mut game, p1, p2) = two_player_in_main();
    let attacker = add_card(&mut game, p1, "Whelp", Zone::Field, (3, 2, 2));
    for i in 0..3 {
        add_card(&mut game, p2, &format!("H{i}"), Zone::Hand, (1, 1, 1));
    }

    let strike = find_tussle(&game, p1, attacker).expect("unopposed strike offered");
    assert!(matches!(strike, Candidate::Tussle { defender: None, .. }));

    let report = execute(&mut game, &strike, &[]).unwrap();
    assert_eq!(game.zones(p2).unwrap().hand.len(), 2);
    assert_eq!(game.zones(p2).unwrap().inactive.len(), 1);
    // Forced out, not defeated: the report lists no field casualties.
    assert!(report.defeated.is_empty());

    // One strike per player per turn: not offered again.
    assert!(find_tussle(&game, p1, attacker).is_none());

    // Budget resets with the next turn of the same player.
    execute(&mut game, &Candidate::EndTurn, &[]).unwrap();
    execute(&mut game, &Candidate::EndTurn, &[]).unwrap();
    assert!(find_tussle(&game, p1, attacker).is_some());
}

#[test]
fn initiative_bonus_turns_a_losing_tussle_simultaneous() {
    let (mut game, p1, p2) = two_player_in_main();
    // 5 speed + 1 initiative matches the defender's 6: both strikes land
    // from pre-strike stats and both lethal cards go down together.
    let attacker = add_card(&mut game, p1, "A", Zone::Field, (5, 3, 3));
    let defender = add_card(&mut game, p2, "D", Zone::Field, (6, 3, 3));
    add_card(&mut game, p1, "Spare1", Zone::Hand, (1, 1, 1));
    add_card(&mut game, p2, "Spare2", Zone::Hand, (1, 1, 1));

    let tussle = find_tussle(&game, p1, attacker).expect("mutual defeat is not filtered");
    let report = execute(&mut game, &tussle, &[]).unwrap();

    assert_eq!(game.cards.get(attacker).unwrap().zone, Zone::Inactive);
    assert_eq!(game.cards.get(defender).unwrap().zone, Zone::Inactive);
    assert_eq!(report.defeated.len(), 2);
    assert!(report.winner.is_none());
}

#[test]
fn defender_without_initiative_strikes_first_on_its_own_turn() {
    let (mut game, p1, p2) = two_player_in_main();
    // Same pair of cards, but attacked from the other side: the speed-6
    // card attacks at 6+1 against 5 and wins cleanly.
    game.turn.active_player = p2;
    let fast = add_card(&mut game, p2, "Fast", Zone::Field, (6, 3, 3));
    let slow = add_card(&mut game, p1, "Slow", Zone::Field, (5, 3, 3));
    add_card(&mut game, p1, "Spare1", Zone::Hand, (1, 1, 1));
    add_card(&mut game, p2, "Spare2", Zone::Hand, (1, 1, 1));

    let tussle = find_tussle(&game, p2, fast).expect("clean win offered");
    execute(&mut game, &tussle, &[]).unwrap();

    assert_eq!(game.cards.get(slow).unwrap().zone, Zone::Inactive);
    assert_eq!(game.cards.get(fast).unwrap().current_stamina, 3);
}

#[test]
fn victory_freezes_the_game() {
    let (mut game, p1, p2) = two_player_in_main();
    let attacker = add_card(&mut game, p1, "A", Zone::Field, (5, 3, 3));
    // p2's last card anywhere playable.
    let last = add_card(&mut game, p2, "Last", Zone::Field, (1, 1, 1));

    let tussle = find_tussle(&game, p1, attacker).unwrap();
    let report = execute(&mut game, &tussle, &[]).unwrap();

    assert_eq!(report.winner, Some(p1));
    assert_eq!(game.winner, Some(p1));
    assert_eq!(game.turn.phase, Phase::Finished);
    assert_eq!(game.cards.get(last).unwrap().zone, Zone::Inactive);

    // Frozen: nothing to enumerate, nothing to execute.
    assert!(enumerate_legal_actions(&game, p1).unwrap().is_empty());
    assert!(matches!(
        execute(&mut game, &Candidate::EndTurn, &[]),
        Err(TussleError::IllegalAction(_))
    ));
}

#[test]
fn inactive_scaled_cost_discount_floors_at_zero() {
    let (mut game, p1, _) = two_player_in_main();
    let hulk = add_card(&mut game, p1, "Hulk", Zone::Hand, (1, 4, 6));
    {
        let card = game.cards.get_mut(hulk).unwrap();
        card.base_cost = 4;
        card.ability = "cont cost -1 per-inactive".to_string();
    }
    for i in 0..3 {
        add_card(&mut game, p1, &format!("Dead{i}"), Zone::Inactive, (1, 1, 0));
    }

    // Three own inactive cards: 4 - 3 = 1.
    assert_eq!(stats::effective_cost(&game, hulk).unwrap(), Some(1));

    for i in 0..3 {
        add_card(&mut game, p1, &format!("More{i}"), Zone::Inactive, (1, 1, 0));
    }
    assert_eq!(stats::effective_cost(&game, hulk).unwrap(), Some(0));

    // And the discounted cost is what the play actually charges.
    game.get_player_mut(p1).unwrap().gain_cc(2);
    let play = enumerate_legal_actions(&game, p1)
        .unwrap()
        .into_iter()
        .find(|c| matches!(c, Candidate::PlayCard { card_id, .. } if *card_id == hulk))
        .unwrap();
    execute(&mut game, &play, &[]).unwrap();
    assert_eq!(game.get_player(p1).unwrap().cc, 2);
    assert_eq!(game.cards.get(hulk).unwrap().zone, Zone::Field);
}

#[test]
fn continuous_buffs_apply_and_retract_with_the_source() {
    let (mut game, p1, p2) = two_player_in_main();
    let whelp = add_card(&mut game, p1, "Whelp", Zone::Field, (3, 2, 2));
    let matriarch = add_card(&mut game, p1, "Matriarch", Zone::Field, (2, 1, 3));
    game.cards.get_mut(matriarch).unwrap().ability = "cont strength +1 own-field".to_string();
    let enemy = add_card(&mut game, p2, "Enemy", Zone::Field, (1, 1, 1));

    assert_eq!(stats::effective_stat(&game, whelp, Stat::Strength).unwrap(), 3);
    assert_eq!(stats::effective_stat(&game, matriarch, Stat::Strength).unwrap(), 2);
    assert_eq!(stats::effective_stat(&game, enemy, Stat::Strength).unwrap(), 1);

    // Source leaves the field: the buff disappears with it.
    game.move_card(matriarch, Zone::Inactive).unwrap();
    assert_eq!(stats::effective_stat(&game, whelp, Stat::Strength).unwrap(), 2);
}

#[test]
fn cc_grant_is_clamped_at_the_cap() {
    let (mut game, p1, p2) = two_player_in_main();
    add_card(&mut game, p1, "Mine", Zone::Hand, (1, 1, 1));
    add_card(&mut game, p2, "Theirs", Zone::Hand, (1, 1, 1));
    game.get_player_mut(p1).unwrap().gain_cc(CC_CAP);

    // Run a full round back to p1; the grant must not overflow the cap.
    execute(&mut game, &Candidate::EndTurn, &[]).unwrap();
    execute(&mut game, &Candidate::EndTurn, &[]).unwrap();
    assert_eq!(game.get_player(p1).unwrap().cc, CC_CAP);
    game.check_invariants().unwrap();
}

#[test]
fn instantaneous_card_resolves_and_deactivates() {
    let (mut game, p1, p2) = two_player_in_main();
    game.get_player_mut(p1).unwrap().gain_cc(3);
    let bolt = add_card(&mut game, p1, "Bolt", Zone::Hand, (0, 0, 0));
    {
        let card = game.cards.get_mut(bolt).unwrap();
        card.category = CardCategory::Instantaneous;
        card.base_cost = 2;
        card.ability = "inst damage 3 target enemy-field".to_string();
    }
    add_card(&mut game, p1, "Spare", Zone::Hand, (1, 1, 1));
    let victim = add_card(&mut game, p2, "Victim", Zone::Field, (2, 2, 4));
    add_card(&mut game, p2, "Spare2", Zone::Hand, (1, 1, 1));

    let play = enumerate_legal_actions(&game, p1)
        .unwrap()
        .into_iter()
        .find(|c| matches!(c, Candidate::PlayCard { card_id, .. } if *card_id == bolt))
        .unwrap();
    execute(&mut game, &play, &[victim]).unwrap();

    assert_eq!(game.cards.get(victim).unwrap().current_stamina, 1);
    assert_eq!(game.cards.get(bolt).unwrap().zone, Zone::Inactive);
    assert_eq!(game.get_player(p1).unwrap().cc, 1);
    game.check_invariants().unwrap();
}

#[test]
fn copied_ability_survives_serialization_by_string() {
    let (mut game, p1, p2) = two_player_in_main();
    game.get_player_mut(p1).unwrap().gain_cc(1);
    let mimic = add_card(&mut game, p1, "Mimic", Zone::Field, (2, 1, 3));
    game.cards.get_mut(mimic).unwrap().ability =
        "act 1 copy-ability target enemy-field".to_string();
    let guard = add_card(&mut game, p2, "Guard", Zone::Field, (1, 1, 5));
    game.cards.get_mut(guard).unwrap().ability = "cont tussle-guard".to_string();

    let activation = enumerate_legal_actions(&game, p1)
        .unwrap()
        .into_iter()
        .find(|c| matches!(c, Candidate::Activate { .. }))
        .unwrap();
    execute(&mut game, &activation, &[guard]).unwrap();

    assert_eq!(
        game.cards.get(mimic).unwrap().copied_ability.as_deref(),
        Some("cont tussle-guard")
    );

    // Only the string persists; a restored snapshot re-derives the same
    // effect objects.
    let restored: GameState =
        serde_json::from_str(&serde_json::to_string(&game).unwrap()).unwrap();
    assert_eq!(
        restored.cards.get(mimic).unwrap().copied_ability.as_deref(),
        Some("cont tussle-guard")
    );
}
