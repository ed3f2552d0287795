use gloomcrawl::{
    GameConfig, ScriptedRolls,
    combat::{CombatResolver, CombatResult, Retaliation, Strike},
    data::{Curse, Enchantment, MonsterKind, Treasure},
    map::Monster,
    player::Player,
};
use proptest::prelude::*;

fn monster(kind: MonsterKind, health: i32, attack_bonus: i32) -> Monster {
    Monster {
        kind,
        health,
        attack_bonus,
    }
}

#[test]
fn killing_blow_gets_no_retaliation() {
    let config = GameConfig::default();
    let mut player = Player::new(&config.progression);
    player.attack_bonus = 5;
    let mut resolver = CombatResolver::new(monster(MonsterKind::Troll, 1, 3));
    let mut rolls = ScriptedRolls::new([0.99, 0.5]);

    let outcome = resolver.exchange(
        &mut player,
        &config.combat,
        &config.rosters.status_effects,
        &mut rolls,
    );
    assert_eq!(outcome.result(), Some(CombatResult::MonsterDefeated));
    assert_eq!(outcome.monster, Retaliation::None);
    assert_eq!(outcome.monster_health, 0);
    assert_eq!(player.health, config.progression.start_health);
}

#[test]
fn sleeping_hero_falls_to_a_heavy_blow() {
    let config = GameConfig::default();
    let mut player = Player::new(&config.progression);
    player.health = 5;
    player.add_curse(Curse::Sleep);
    let mut resolver = CombatResolver::new(monster(MonsterKind::Genie, 30, 10));
    // hero misses, genie hits for floor(0.99 * 10) = 9 less armour, curse roll fails
    let mut rolls = ScriptedRolls::new([0.0, 0.9, 0.99, 0.9]);

    let outcome = resolver.exchange(
        &mut player,
        &config.combat,
        &config.rosters.status_effects,
        &mut rolls,
    );
    assert_eq!(outcome.hero, Strike::Miss);
    assert_eq!(outcome.result(), Some(CombatResult::PlayerDefeated));
    assert!(!player.alive);
    assert_eq!(player.health, 0);
}

proptest! {
    #[test]
    fn bow_always_kills_on_a_hit(
        health in 1i32..60,
        attack in 0i32..10,
        rolls in proptest::collection::vec(0.0f64..1.0, 8),
    ) {
        let config = GameConfig::default();
        let mut player = Player::new(&config.progression);
        player.add_enchantment(Enchantment::Bow);
        let mut resolver = CombatResolver::new(monster(MonsterKind::Dragon, health, attack));
        let mut rolls = ScriptedRolls::new(rolls);
        let outcome = resolver.exchange(
            &mut player,
            &config.combat,
            &config.rosters.status_effects,
            &mut rolls,
        );
        match outcome.hero {
            Strike::Hit { damage, fatal } => {
                prop_assert!(fatal);
                prop_assert_eq!(damage, health);
                prop_assert_eq!(outcome.result(), Some(CombatResult::MonsterDefeated));
            }
            Strike::Miss => prop_assert_eq!(outcome.monster_health, health),
        }
    }

    #[test]
    fn health_never_goes_negative(
        start in 1i32..20,
        attack in 0i32..50,
        armour in -5i32..10,
        rolls in proptest::collection::vec(0.0f64..1.0, 8),
    ) {
        let config = GameConfig::default();
        let mut player = Player::new(&config.progression);
        player.health = start;
        player.armour_class = armour;
        let mut resolver = CombatResolver::new(monster(MonsterKind::Spider, 100, attack));
        let mut rolls = ScriptedRolls::new(rolls);
        let outcome = resolver.exchange(
            &mut player,
            &config.combat,
            &config.rosters.status_effects,
            &mut rolls,
        );
        prop_assert!(player.health >= 0);
        prop_assert!(player.health <= start);
        prop_assert_eq!(player.alive, player.health > 0);
        prop_assert_eq!(outcome.player_health, player.health);
    }

    #[test]
    fn pickups_never_cost_gold(
        index in 0usize..Treasure::ALL.len(),
        clover in any::<bool>(),
        roll in 0.0f64..1.0,
    ) {
        let config = GameConfig::default();
        let mut player = Player::new(&config.progression);
        player.gold = 10;
        if clover {
            player.add_enchantment(Enchantment::Clover);
        }
        let mut rolls = ScriptedRolls::new([roll]);
        player.power_up(Treasure::ALL[index], &config.progression, &mut rolls);
        prop_assert!(player.gold >= 10);
    }
}
