//! Scenario tests driving whole combats through `CombatSession`.

use combat_core::{
    Abilities, AttackType, CombatConfig, CombatError, CombatEvent, CombatOutcome, CombatPhase,
    CombatSession, CombatTrigger, DamageTarget, Element, EnemyAttack, EnemyDefinition,
    EnemyInstanceId, EnemyRegistry, Ineligibility, PhaseRule, Resistances, Resolution,
    UnitCondition, UnitId, UnitSpec,
};

const FIRST: EnemyInstanceId = EnemyInstanceId(0);
const SECOND: EnemyInstanceId = EnemyInstanceId(1);

fn registry() -> EnemyRegistry {
    EnemyRegistry::from_definitions(
        1,
        [
            EnemyDefinition::new("orc", 3, 4, 2).with_name("Prowlers"),
            EnemyDefinition::new("wolf", 4, 3, 2).with_abilities(Abilities::SWIFT),
            EnemyDefinition::new("guardsmen", 3, 5, 3).with_abilities(Abilities::FORTIFIED),
            EnemyDefinition::new("salamander", 2, 6, 4)
                .with_attacks([EnemyAttack::new(2, Element::Fire)])
                .with_resistances(Resistances::FIRE),
            EnemyDefinition::new("brute", 3, 3, 3).with_abilities(Abilities::BRUTAL),
            EnemyDefinition::new("viper", 2, 3, 2).with_abilities(Abilities::POISON),
            EnemyDefinition::new("shaman", 2, 3, 4).with_summons("orc"),
            EnemyDefinition::new("golem", 5, 4, 4).with_abilities(Abilities::CUMBERSOME),
            EnemyDefinition::new("twins", 3, 5, 4).with_attacks([
                EnemyAttack::new(3, Element::Physical),
                EnemyAttack::new(2, Element::Fire),
            ]),
        ],
    )
    .unwrap()
}

fn session(enemies: &[&str]) -> CombatSession {
    CombatSession::builder(CombatTrigger::Default)
        .enemies(enemies.iter().copied())
        .build(&registry())
        .unwrap()
}

/// Advances from ranged-and-siege into the block phase.
fn to_block(session: &mut CombatSession) {
    session.start().unwrap();
    session.advance_phase().unwrap();
    assert_eq!(session.phase(), CombatPhase::Block);
}

#[test]
fn single_orc_is_blocked_then_defeated() {
    let mut session = session(&["orc"]);

    let started = session.start().unwrap();
    assert!(matches!(started.events[0], CombatEvent::CombatStarted { .. }));
    assert_eq!(session.phase(), CombatPhase::RangedAndSiege);

    session.advance_phase().unwrap();
    session
        .contribute(AttackType::Melee, Element::Physical, 3)
        .unwrap();
    session.assign_block(FIRST, 0, Element::Physical, 3).unwrap();
    assert!(session.enemy_view(FIRST).unwrap().attacks[0].is_blocked);

    // nothing unblocked: damage assignment is skipped
    session.advance_phase().unwrap();
    assert_eq!(session.phase(), CombatPhase::Attack);

    session
        .contribute(AttackType::Melee, Element::Physical, 4)
        .unwrap();
    session
        .assign_attack(FIRST, AttackType::Melee, Element::Physical, 4)
        .unwrap();
    assert!(session.enemy_view(FIRST).unwrap().is_defeated);
    assert_eq!(session.fame(), 2);

    // the last defeat ends the combat without another advance
    assert_eq!(session.phase(), CombatPhase::Resolved);
    assert_eq!(session.outcome(), Some(CombatOutcome::Victory));
    assert!(matches!(
        session.events().last(),
        Some(CombatEvent::CombatEnded {
            outcome: CombatOutcome::Victory,
            fame: 2
        })
    ));
    assert!(session.pool().is_empty());
}

#[test]
fn swift_enemy_needs_double_block() {
    let mut session = session(&["wolf"]);
    to_block(&mut session);

    let view = session.enemy_view(FIRST).unwrap();
    assert_eq!(view.attacks[0].required_block, 8);
    assert_eq!(view.armor, 3);

    session
        .contribute(AttackType::Melee, Element::Physical, 8)
        .unwrap();
    session.assign_block(FIRST, 0, Element::Physical, 4).unwrap();
    let view = session.enemy_view(FIRST).unwrap();
    assert!(!view.attacks[0].is_blocked);
    assert_eq!(view.attacks[0].remaining_block, 4);

    let err = session.advance_phase().unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::PhaseViolation {
            phase: CombatPhase::Block,
            rule: PhaseRule::OpenAssignments(1)
        }
    );

    session.assign_block(FIRST, 0, Element::Physical, 4).unwrap();
    assert!(session.enemy_view(FIRST).unwrap().attacks[0].is_blocked);
}

#[test]
fn fortified_enemy_only_takes_siege_in_ranged_phase() {
    let mut session = session(&["guardsmen"]);
    session.start().unwrap();
    session
        .contribute(AttackType::Ranged, Element::Physical, 5)
        .unwrap();
    session
        .contribute(AttackType::Siege, Element::Physical, 5)
        .unwrap();
    let events_before = session.events().count();

    let err = session
        .assign_attack(FIRST, AttackType::Ranged, Element::Physical, 5)
        .unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::IneligibleContribution(Ineligibility::Fortified)
    );
    assert_eq!(session.events().count(), events_before);

    session
        .assign_attack(FIRST, AttackType::Siege, Element::Physical, 5)
        .unwrap();
    assert!(session.enemy_view(FIRST).unwrap().is_defeated);
    assert_eq!(
        session
            .pool()
            .balance(combat_core::PoolBucket::new(AttackType::Ranged, Element::Physical)),
        5
    );

    assert_eq!(session.outcome(), Some(CombatOutcome::Victory));
    assert_eq!(session.phase(), CombatPhase::Resolved);
}

#[test]
fn resisted_element_counts_half() {
    let mut session = session(&["salamander"]);
    to_block(&mut session);
    session.advance_phase().unwrap();
    assert_eq!(session.phase(), CombatPhase::AssignDamage);
    session.assign_damage(0, DamageTarget::Hero).unwrap();
    session.advance_phase().unwrap();
    assert_eq!(session.phase(), CombatPhase::Attack);

    session.contribute(AttackType::Melee, Element::Fire, 6).unwrap();
    session
        .contribute(AttackType::Melee, Element::Physical, 6)
        .unwrap();

    let fire = session
        .assign_attack(FIRST, AttackType::Melee, Element::Fire, 6)
        .unwrap();
    let view = session.enemy_view(FIRST).unwrap();
    assert!(!view.is_defeated);
    assert_eq!(view.remaining_attack, 3);

    session.unassign_attack(fire).unwrap();
    session
        .assign_attack(FIRST, AttackType::Melee, Element::Physical, 6)
        .unwrap();
    assert!(session.enemy_view(FIRST).unwrap().is_defeated);
    assert_eq!(
        session
            .pool()
            .balance(combat_core::PoolBucket::melee(Element::Fire)),
        6
    );
}

#[test]
fn wounded_unit_is_destroyed_by_second_attack() {
    let mut session = CombatSession::builder(CombatTrigger::Default)
        .enemies(["orc", "orc", "orc"])
        .unit(UnitSpec::ready("peasants"))
        .build(&registry())
        .unwrap();
    to_block(&mut session);
    session.advance_phase().unwrap();
    assert_eq!(session.pending_damage().len(), 3);

    let unit = DamageTarget::Unit(UnitId(0));
    session.assign_damage(0, unit).unwrap();
    assert_eq!(session.units()[0].condition, UnitCondition::Wounded);
    session.assign_damage(1, unit).unwrap();
    assert_eq!(session.units()[0].condition, UnitCondition::Destroyed);

    let err = session.assign_damage(2, unit).unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::AlreadyResolved(Resolution::UnitDestroyed(UnitId(0)))
    );

    let err = session.advance_phase().unwrap_err();
    assert!(matches!(
        err.error(),
        CombatError::PhaseViolation {
            rule: PhaseRule::PendingDamage(1),
            ..
        }
    ));
    session.assign_damage(2, DamageTarget::Hero).unwrap();
    assert_eq!(session.hero().wounds_to_hand, 1);
    session.advance_phase().unwrap();
    assert_eq!(session.phase(), CombatPhase::Attack);
}

#[test]
fn hero_knockout_ends_the_combat() {
    let mut session = CombatSession::builder(CombatTrigger::Default)
        .enemies(["orc", "orc"])
        .config(CombatConfig::default().with_knockout_threshold(2))
        .build(&registry())
        .unwrap();
    to_block(&mut session);
    session.advance_phase().unwrap();

    session.assign_damage(0, DamageTarget::Hero).unwrap();
    assert!(session.state().is_active());

    let outcome = session.assign_damage(1, DamageTarget::Hero).unwrap();
    assert!(
        outcome
            .events
            .iter()
            .any(|event| matches!(event, CombatEvent::HeroKnockedOut { wounds: 2 }))
    );
    assert_eq!(session.phase(), CombatPhase::Resolved);
    assert_eq!(session.outcome(), Some(CombatOutcome::KnockedOut));
    assert!(session.hero().knocked_out);
    // state remains queryable
    assert_eq!(session.enemy_views().len(), 2);
}

#[test]
fn brutal_and_poison_hooks() {
    let mut session = CombatSession::builder(CombatTrigger::Default)
        .enemies(["brute", "viper"])
        .unit(UnitSpec::ready("guards"))
        .config(CombatConfig::default().with_armor_wounds(2))
        .build(&registry())
        .unwrap();
    to_block(&mut session);
    session.advance_phase().unwrap();

    // brutal 3 counts as 6 against armor 2
    session.assign_damage(0, DamageTarget::Hero).unwrap();
    assert_eq!(session.hero().wounds_to_hand, 3);
    assert_eq!(session.hero().wounds_to_discard, 0);

    // poison destroys a unit outright
    session.assign_damage(1, DamageTarget::Unit(UnitId(0))).unwrap();
    assert_eq!(session.units()[0].condition, UnitCondition::Destroyed);
}

#[test]
fn custom_wound_rules_replace_the_configured_ones() {
    use combat_core::{HeroWounds, Hit, WoundRules};

    /// Every hit lands in the discard pile instead of the hand.
    struct Shielded;

    impl WoundRules for Shielded {
        fn hero_wounds(&self, _hit: &Hit) -> HeroWounds {
            HeroWounds {
                to_hand: 0,
                to_discard: 1,
                discard_non_wound_cards: false,
            }
        }
    }

    let mut session = session(&["brute"]).with_wound_rules(Shielded);
    to_block(&mut session);
    session.advance_phase().unwrap();
    session.assign_damage(0, DamageTarget::Hero).unwrap();

    assert_eq!(session.hero().wounds_to_hand, 0);
    assert_eq!(session.hero().wounds_to_discard, 1);
}

#[test]
fn rejected_commands_leave_state_untouched() {
    let mut session = session(&["orc"]);
    to_block(&mut session);
    session
        .contribute(AttackType::Melee, Element::Physical, 2)
        .unwrap();
    let before = session.state().clone();

    let err = session
        .assign_block(FIRST, 0, Element::Physical, 3)
        .unwrap_err();
    assert!(matches!(
        err.error(),
        CombatError::InsufficientPool {
            requested: 3,
            available: 2,
            ..
        }
    ));

    let err = session
        .assign_block(FIRST, 0, Element::Physical, 0)
        .unwrap_err();
    assert_eq!(*err.error(), CombatError::InvalidAmount);

    let err = session
        .assign_block(EnemyInstanceId(9), 0, Element::Physical, 1)
        .unwrap_err();
    assert_eq!(*err.error(), CombatError::UnknownEnemy(EnemyInstanceId(9)));

    let err = session
        .contribute(AttackType::Ranged, Element::ColdFire, 2)
        .unwrap_err();
    assert!(matches!(
        err.error(),
        CombatError::IneligibleContribution(Ineligibility::InvalidBucket(_))
    ));

    assert_eq!(session.state(), &before);
}

#[test]
fn overflowing_contribution_is_recoverable() {
    use combat_core::{GameError, PoolBucket};

    let mut session = session(&["orc"]);
    session.start().unwrap();
    session
        .contribute(AttackType::Melee, Element::Physical, u32::MAX)
        .unwrap();
    let before = session.state().clone();

    let err = session
        .contribute(AttackType::Melee, Element::Physical, 1)
        .unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::PoolOverflow {
            bucket: PoolBucket::melee(Element::Physical),
            balance: u32::MAX,
            amount: 1
        }
    );
    assert!(err.severity().is_recoverable());
    assert_eq!(err.error_code(), "COMBAT_POOL_OVERFLOW");
    assert_eq!(session.state(), &before);
}

#[test]
fn block_on_blocked_attack_is_already_resolved() {
    let mut session = session(&["orc"]);
    to_block(&mut session);
    session
        .contribute(AttackType::Melee, Element::Physical, 5)
        .unwrap();
    session.assign_block(FIRST, 0, Element::Physical, 3).unwrap();

    let before = session.state().clone();
    let err = session
        .assign_block(FIRST, 0, Element::Physical, 1)
        .unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::AlreadyResolved(Resolution::AttackBlocked {
            enemy: FIRST,
            attack_index: 0
        })
    );
    assert_eq!(session.state(), &before);
}

#[test]
fn inefficient_block_is_summed_then_halved() {
    let mut session = session(&["salamander"]);
    to_block(&mut session);
    session.contribute(AttackType::Melee, Element::Ice, 6).unwrap();

    // ice against a fire attack of 2 is halved: 3 + 1 = 4 raw -> 2
    session.assign_block(FIRST, 0, Element::Ice, 3).unwrap();
    assert!(!session.enemy_view(FIRST).unwrap().attacks[0].is_blocked);
    let err = session.assign_block(FIRST, 0, Element::Ice, 2).unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::OverAssignment {
            requested: 2,
            needed: 1
        }
    );
    session.assign_block(FIRST, 0, Element::Ice, 1).unwrap();
    assert!(session.enemy_view(FIRST).unwrap().attacks[0].is_blocked);
}

#[test]
fn unassign_returns_strength_within_the_phase() {
    let mut session = session(&["orc"]);
    to_block(&mut session);
    session
        .contribute(AttackType::Melee, Element::Physical, 3)
        .unwrap();

    let partial = session.assign_block(FIRST, 0, Element::Physical, 2).unwrap();
    assert!(session.advance_phase().is_err());
    session.unassign_block(partial).unwrap();
    assert_eq!(
        session
            .pool()
            .balance(combat_core::PoolBucket::melee(Element::Physical)),
        3
    );

    let full = session.assign_block(FIRST, 0, Element::Physical, 3).unwrap();
    session.advance_phase().unwrap();
    assert_eq!(session.phase(), CombatPhase::Attack);

    let err = session.unassign_block(full).unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::PhaseViolation {
            phase: CombatPhase::Attack,
            rule: PhaseRule::PhaseEnded(CombatPhase::Block)
        }
    );
    let err = session.unassign_block(partial).unwrap_err();
    assert!(matches!(
        err.error(),
        CombatError::AlreadyResolved(Resolution::AssignmentReversed(_))
    ));
}

#[test]
fn last_defeat_ends_the_combat_immediately() {
    let mut session = session(&["orc"]);
    session.start().unwrap();
    session
        .contribute(AttackType::Ranged, Element::Physical, 4)
        .unwrap();
    session
        .assign_attack(FIRST, AttackType::Ranged, Element::Physical, 4)
        .unwrap();

    assert_eq!(session.phase(), CombatPhase::Resolved);
    assert_eq!(session.outcome(), Some(CombatOutcome::Victory));
    assert_eq!(session.fame(), 2);

    // a late withdrawal cannot downgrade the victory
    let err = session.withdraw().unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::PhaseViolation {
            phase: CombatPhase::Resolved,
            rule: PhaseRule::Inactive
        }
    );
    assert_eq!(session.outcome(), Some(CombatOutcome::Victory));
}

#[test]
fn defeat_is_final() {
    let mut session = session(&["orc", "orc"]);
    session.start().unwrap();
    session
        .contribute(AttackType::Ranged, Element::Physical, 4)
        .unwrap();
    let id = session
        .assign_attack(FIRST, AttackType::Ranged, Element::Physical, 4)
        .unwrap();

    let err = session.unassign_attack(id).unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::AlreadyResolved(Resolution::EnemyDefeated(FIRST))
    );
}

#[test]
fn abandoned_attack_stays_spent() {
    let mut session = session(&["orc"]);
    session.start().unwrap();
    session
        .contribute(AttackType::Ranged, Element::Physical, 2)
        .unwrap();
    let id = session
        .assign_attack(FIRST, AttackType::Ranged, Element::Physical, 2)
        .unwrap();
    assert!(session.advance_phase().is_err());

    session.abandon_attack(FIRST).unwrap();
    assert!(session.pool().is_empty());
    assert!(session.pool().is_conserved());
    assert_eq!(session.enemy_view(FIRST).unwrap().remaining_attack, 4);

    let err = session.unassign_attack(id).unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::AlreadyResolved(Resolution::AssignmentAbandoned(id))
    );
    session.advance_phase().unwrap();
    assert_eq!(session.phase(), CombatPhase::Block);
}

#[test]
fn abandoned_block_lets_the_attack_through() {
    let mut session = session(&["orc"]);
    to_block(&mut session);
    session
        .contribute(AttackType::Melee, Element::Physical, 2)
        .unwrap();
    let id = session.assign_block(FIRST, 0, Element::Physical, 2).unwrap();
    assert!(session.advance_phase().is_err());

    session.abandon_block(FIRST, 0).unwrap();
    assert!(session.pool().is_empty());
    assert!(session.pool().is_conserved());
    let attack = session.enemy_view(FIRST).unwrap().attacks[0];
    assert!(!attack.is_blocked);
    assert_eq!(attack.remaining_block, 3);

    let err = session.unassign_block(id).unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::AlreadyResolved(Resolution::AssignmentAbandoned(id))
    );

    session.advance_phase().unwrap();
    assert_eq!(session.phase(), CombatPhase::AssignDamage);
    assert_eq!(session.pending_damage().len(), 1);
}

#[test]
fn each_attack_is_blocked_on_its_own() {
    let mut session = session(&["twins"]);
    to_block(&mut session);

    session
        .contribute(AttackType::Melee, Element::Physical, 3)
        .unwrap();
    session.assign_block(FIRST, 0, Element::Physical, 3).unwrap();

    let view = session.enemy_view(FIRST).unwrap();
    assert!(view.attacks[0].is_blocked);
    assert!(!view.attacks[1].is_blocked);
    assert_eq!(view.attacks[1].remaining_block, 2);
    assert!(!view.is_blocked);

    let err = session
        .assign_block(FIRST, 0, Element::Physical, 1)
        .unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::AlreadyResolved(Resolution::AttackBlocked {
            enemy: FIRST,
            attack_index: 0
        })
    );

    session.advance_phase().unwrap();
    assert_eq!(session.phase(), CombatPhase::AssignDamage);
    let pending = session.pending_damage();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].1.enemy, FIRST);
    assert_eq!(pending[0].1.attack_index, 1);
    assert_eq!(pending[0].1.hit.damage, 2);
    assert_eq!(pending[0].1.hit.element, Element::Fire);
}

#[test]
fn summoned_enemy_attacks_for_its_summoner() {
    let mut session = session(&["shaman"]);
    session.start().unwrap();
    let entered = session.advance_phase().unwrap();
    assert!(entered.events.iter().any(|event| matches!(
        event,
        CombatEvent::EnemySummoned {
            summoner: FIRST,
            summoned: SECOND,
            ..
        }
    )));

    session
        .contribute(AttackType::Melee, Element::Physical, 3)
        .unwrap();
    let err = session
        .assign_block(FIRST, 0, Element::Physical, 2)
        .unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::AlreadyResolved(Resolution::AttackDelegated(FIRST))
    );

    session.assign_block(SECOND, 0, Element::Physical, 3).unwrap();
    let attack = session.advance_phase().unwrap();
    assert_eq!(session.phase(), CombatPhase::Attack);
    assert!(
        attack
            .events
            .iter()
            .any(|event| matches!(event, CombatEvent::EnemyDismissed { enemy: SECOND }))
    );
    assert!(session.enemy_view(SECOND).unwrap().dismissed);

    session
        .contribute(AttackType::Melee, Element::Physical, 4)
        .unwrap();
    let err = session
        .assign_attack(SECOND, AttackType::Melee, Element::Physical, 4)
        .unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::AlreadyResolved(Resolution::EnemyDismissed(SECOND))
    );

    session
        .assign_attack(FIRST, AttackType::Melee, Element::Physical, 3)
        .unwrap();
    assert_eq!(session.outcome(), Some(CombatOutcome::Victory));
    assert_eq!(session.fame(), 4);
}

#[test]
fn unblocked_summoned_attack_is_queued_instead_of_summoner() {
    let mut session = session(&["shaman"]);
    to_block(&mut session);
    session.advance_phase().unwrap();

    let pending = session.pending_damage();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].1.enemy, SECOND);
    assert_eq!(pending[0].1.hit.damage, 3);
}

#[test]
fn cumbersome_reduction_can_remove_the_attack() {
    let mut session = session(&["golem", "orc"]);
    to_block(&mut session);

    let err = session.reduce_attack(SECOND, 0, 1).unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::IneligibleContribution(Ineligibility::NotCumbersome)
    );
    let err = session.reduce_attack(FIRST, 0, 6).unwrap_err();
    assert!(matches!(
        err.error(),
        CombatError::OverAssignment { needed: 5, .. }
    ));

    session.reduce_attack(FIRST, 0, 2).unwrap();
    assert_eq!(session.enemy_view(FIRST).unwrap().attacks[0].required_block, 3);
    session.reduce_attack(FIRST, 0, 3).unwrap();
    assert!(session.enemy_view(FIRST).unwrap().attacks[0].is_blocked);

    session.advance_phase().unwrap();
    let pending = session.pending_damage();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].1.enemy, SECOND);
}

#[test]
fn withdrawal_depends_on_trigger() {
    let mut assault = CombatSession::builder(CombatTrigger::FortifiedAssault)
        .enemy("guardsmen")
        .build(&registry())
        .unwrap();
    assault.start().unwrap();
    let err = assault.withdraw().unwrap_err();
    assert!(matches!(
        err.error(),
        CombatError::PhaseViolation {
            rule: PhaseRule::WithdrawalRefused,
            ..
        }
    ));

    let mut challenge = CombatSession::builder(CombatTrigger::Challenge)
        .enemy("orc")
        .build(&registry())
        .unwrap();
    challenge.start().unwrap();
    challenge.withdraw().unwrap();
    assert_eq!(challenge.outcome(), Some(CombatOutcome::PartialSurvival));
}

#[test]
fn attack_phase_ending_with_survivors_is_partial() {
    let mut session = session(&["orc", "wolf"]);
    session.start().unwrap();
    session
        .contribute(AttackType::Ranged, Element::Physical, 4)
        .unwrap();
    session
        .assign_attack(FIRST, AttackType::Ranged, Element::Physical, 4)
        .unwrap();
    session.advance_phase().unwrap();
    session.advance_phase().unwrap();
    // the defeated orc queues nothing
    assert_eq!(session.pending_damage().len(), 1);
    session.assign_damage(0, DamageTarget::Hero).unwrap();
    session.advance_phase().unwrap();
    session.advance_phase().unwrap();

    assert_eq!(session.outcome(), Some(CombatOutcome::PartialSurvival));
    assert_eq!(session.fame(), 2);
}

#[test]
fn setup_validates_declaration() {
    let err = CombatSession::builder(CombatTrigger::Default)
        .build(&registry())
        .unwrap_err();
    assert_eq!(err, combat_core::SetupError::NoEnemies);

    let err = CombatSession::builder(CombatTrigger::Default)
        .enemy("dragon")
        .build(&registry())
        .unwrap_err();
    assert!(matches!(err, combat_core::SetupError::UnknownEnemyType(_)));
}

#[test]
fn phases_never_repeat() {
    let mut session = session(&["orc"]);
    let mut phases = vec![session.phase()];
    session.start().unwrap();
    phases.push(session.phase());
    while !session.is_resolved() {
        if session.phase() == CombatPhase::AssignDamage {
            let entries: Vec<usize> = session
                .pending_damage()
                .iter()
                .map(|(entry, _)| *entry)
                .collect();
            for entry in entries {
                session.assign_damage(entry, DamageTarget::Hero).unwrap();
            }
        }
        session.advance_phase().unwrap();
        phases.push(session.phase());
    }

    assert!(phases.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(
        phases,
        vec![
            CombatPhase::NotStarted,
            CombatPhase::RangedAndSiege,
            CombatPhase::Block,
            CombatPhase::AssignDamage,
            CombatPhase::Attack,
            CombatPhase::Resolved,
        ]
    );
    let err = session.start().unwrap_err();
    assert_eq!(
        *err.error(),
        CombatError::AlreadyResolved(Resolution::CombatStarted)
    );
}
