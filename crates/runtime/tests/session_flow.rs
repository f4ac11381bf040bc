use tactics_content::MatchContent;
use tactics_core::{
    AttackRange, BehaviorId, Board, Coordinate, CoverTable, DamageRange, Edge, MovementRules,
    OutOfRangeAttack, Path, PathPlanner, RulesConfig, TargetPriority, TeamId, TerrainKind, Tile,
    Unit, UnitBehavior, UnitError, UnitId, WeaponData,
};
use tactics_runtime::{
    AbortedAction, GameEvent, MatchSession, SessionError, SessionPhase, TickOutcome, Topic,
};
use tokio::sync::broadcast::Receiver;

fn open_board(width: i32, height: i32) -> Board {
    let tiles = (0..height).flat_map(|y| {
        (0..width).map(move |x| (Coordinate::new(x, y), Tile::new(TerrainKind::Floor)))
    });
    Board::new(tiles, Vec::<(Coordinate, Coordinate, Edge)>::new()).unwrap()
}

fn soldier(id: u32, team: u8, x: i32, y: i32, weapon: &str) -> Unit {
    Unit::new(UnitId(id), TeamId(team), Coordinate::new(x, y), 5, 4, weapon)
        .with_accuracy(100)
        .with_behavior(BehaviorId(1))
}

fn content(roster: Vec<Unit>) -> MatchContent {
    MatchContent {
        rules: RulesConfig::default(),
        board: open_board(7, 5),
        weapons: vec![
            WeaponData::new("spear", DamageRange::fixed(3), AttackRange::Melee),
            WeaponData::new("bow", DamageRange::fixed(2), AttackRange::Ranged { tiles: 6 })
                .with_ammo("arrows", 1),
        ],
        covers: CoverTable::default(),
        behaviors: vec![UnitBehavior::new(BehaviorId(1), "Hunter", TargetPriority::Closest)],
        roster,
    }
}

fn duel() -> MatchSession {
    let mut session = MatchSession::new(
        content(vec![
            soldier(1, 0, 0, 2, "spear"),
            soldier(2, 1, 6, 2, "bow").with_ammo("arrows", 1),
        ]),
        7,
    );
    session.on_build().unwrap();
    session
}

fn drain(rx: &mut Receiver<GameEvent>) -> Vec<GameEvent> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

#[test]
fn build_validates_roster() {
    let mut unknown_weapon = MatchSession::new(
        content(vec![soldier(1, 0, 0, 0, "spear"), soldier(2, 1, 1, 1, "trebuchet")]),
        0,
    );
    assert!(matches!(
        unknown_weapon.on_build(),
        Err(SessionError::UnknownWeapon { unit: UnitId(2), .. })
    ));

    let mut one_team = MatchSession::new(
        content(vec![soldier(1, 0, 0, 0, "spear"), soldier(2, 0, 1, 1, "spear")]),
        0,
    );
    assert_eq!(one_team.on_build(), Err(SessionError::NotEnoughTeams));

    let mut stacked = MatchSession::new(
        content(vec![soldier(1, 0, 2, 2, "spear"), soldier(2, 1, 2, 2, "spear")]),
        0,
    );
    assert!(matches!(
        stacked.on_build(),
        Err(SessionError::InvalidPlacement { unit: UnitId(2), .. })
    ));

    let mut off_board = MatchSession::new(
        content(vec![soldier(1, 0, 0, 0, "spear"), soldier(2, 1, 30, 0, "spear")]),
        0,
    );
    assert!(matches!(
        off_board.on_build(),
        Err(SessionError::InvalidPlacement { .. })
    ));

    assert!(MatchSession::new(content(vec![]), 0).on_build().is_err());
}

#[test]
fn requests_need_a_built_session() {
    let mut session = MatchSession::new(
        content(vec![soldier(1, 0, 0, 0, "spear"), soldier(2, 1, 3, 0, "spear")]),
        0,
    );
    assert_eq!(
        session.queue_move(UnitId(1), Coordinate::new(1, 0)).unwrap_err(),
        SessionError::NotBuilt
    );
    assert_eq!(session.on_tick(), Err(SessionError::NotBuilt));

    session.on_build().unwrap();
    assert_eq!(session.phase(), SessionPhase::Running);
    assert_eq!(session.on_build(), Err(SessionError::AlreadyBuilt));
}

#[test]
fn lowest_team_opens_the_match() {
    let session = duel();
    assert_eq!(session.turn().active_team, TeamId(0));
    assert_eq!(session.turn().round, 0);
    assert_eq!(session.active_units(), vec![UnitId(1)]);
}

#[test]
fn move_advances_one_tile_per_tick() {
    let mut session = duel();
    let mut movement = session.subscribe(Topic::Movement);

    let plan = session.queue_move(UnitId(1), Coordinate::new(2, 2)).unwrap();
    assert_eq!(plan.cost().steps, 2);
    assert!(plan.cost().is_in_range());

    assert_eq!(session.on_tick(), Ok(TickOutcome::Advanced));
    assert_eq!(session.unit(UnitId(1)).unwrap().position, Coordinate::new(1, 2));
    assert_eq!(session.on_tick(), Ok(TickOutcome::Completed));
    assert_eq!(session.on_tick(), Ok(TickOutcome::Idle));

    let unit = session.unit(UnitId(1)).unwrap();
    assert_eq!(unit.position, Coordinate::new(2, 2));
    assert_eq!(unit.action_points(), 2);

    let events = drain(&mut movement);
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[1],
        GameEvent::UnitMoved {
            unit: UnitId(1),
            from: Coordinate::new(1, 2),
            to: Coordinate::new(2, 2),
            action_points_left: 2,
        }
    );
}

#[test]
fn only_the_affordable_prefix_is_walked() {
    let mut session = duel();

    let plan = session.queue_move(UnitId(1), Coordinate::new(5, 2)).unwrap();
    assert_eq!(plan.cost().steps, 5);
    assert!(!plan.cost().is_in_range());
    assert_eq!(plan.split.joint(), Some(Coordinate::new(4, 2)));
    assert_eq!(plan.destination(), Coordinate::new(4, 2));

    while session.on_tick().unwrap() == TickOutcome::Advanced {}

    let unit = session.unit(UnitId(1)).unwrap();
    assert_eq!(unit.position, Coordinate::new(4, 2));
    assert_eq!(unit.action_points(), 0);
    assert!(matches!(
        session.queue_move(UnitId(1), Coordinate::new(4, 3)),
        Err(SessionError::Unit(UnitError::InsufficientActionPoints { .. }))
    ));
}

#[test]
fn abort_keeps_walked_tiles() {
    let mut session = duel();
    let mut turn_events = session.subscribe(Topic::Turn);

    session.queue_move(UnitId(1), Coordinate::new(3, 2)).unwrap();
    assert_eq!(session.on_tick(), Ok(TickOutcome::Advanced));

    let aborted = session.abort_action().unwrap();
    assert_eq!(
        aborted,
        AbortedAction::Move {
            at: Coordinate::new(1, 2),
            skipped: 2
        }
    );

    let unit = session.unit(UnitId(1)).unwrap();
    assert_eq!(unit.position, Coordinate::new(1, 2));
    assert_eq!(unit.action_points(), 3);
    assert!(session.pending_action().is_none());
    assert_eq!(session.on_tick(), Ok(TickOutcome::Idle));
    assert_eq!(session.abort_action(), Err(SessionError::NoActionInProgress));

    assert!(
        drain(&mut turn_events)
            .iter()
            .any(|event| matches!(event, GameEvent::ActionAborted { unit: UnitId(1), .. }))
    );
}

#[test]
fn one_action_at_a_time() {
    let mut session = duel();
    session.queue_move(UnitId(1), Coordinate::new(2, 2)).unwrap();

    assert_eq!(
        session.queue_move(UnitId(1), Coordinate::new(0, 0)).unwrap_err(),
        SessionError::ActionInProgress
    );
    assert_eq!(session.end_turn(), Err(SessionError::ActionInProgress));
}

#[test]
fn only_the_active_team_acts() {
    let mut session = duel();
    assert_eq!(
        session.queue_move(UnitId(2), Coordinate::new(5, 2)).unwrap_err(),
        SessionError::WrongTeam {
            active: TeamId(0),
            requested: TeamId(1)
        }
    );
}

#[test]
fn cannot_move_onto_a_unit_or_where_it_stands() {
    let mut session = duel();
    assert_eq!(
        session.queue_move(UnitId(1), Coordinate::new(6, 2)).unwrap_err(),
        SessionError::TileOccupied(Coordinate::new(6, 2))
    );
    assert_eq!(
        session.queue_move(UnitId(1), Coordinate::new(0, 2)).unwrap_err(),
        SessionError::AlreadyThere(UnitId(1))
    );
}

#[test]
fn units_route_around_each_other() {
    let mut session = MatchSession::new(
        content(vec![
            soldier(1, 0, 0, 0, "spear"),
            soldier(2, 0, 1, 0, "spear"),
            soldier(3, 1, 6, 4, "spear"),
        ]),
        0,
    );
    session.on_build().unwrap();

    let plan = session.plan_move(UnitId(1), Coordinate::new(2, 0)).unwrap().unwrap();
    assert!(!plan.path.tiles().contains(&Coordinate::new(1, 0)));
    assert_eq!(plan.cost().steps, 4);
}

#[test]
fn out_of_range_attack_is_rejected_not_missed() {
    let mut session = duel();
    let mut combat = session.subscribe(Topic::Combat);

    assert_eq!(
        session.preview_attack(UnitId(1), UnitId(2)),
        Err(SessionError::OutOfRange(OutOfRangeAttack::MeleeNotAdjacent {
            distance: 6
        }))
    );
    assert!(session.queue_attack(UnitId(1), UnitId(2)).is_err());
    assert!(session.pending_action().is_none());

    let events = drain(&mut combat);
    assert!(matches!(
        events.as_slice(),
        [GameEvent::AttackRejected {
            attacker: UnitId(1),
            target: UnitId(2),
            ..
        }]
    ));
}

#[test]
fn friendly_fire_is_refused() {
    let session = MatchSession::new(
        content(vec![
            soldier(1, 0, 0, 0, "spear"),
            soldier(2, 0, 1, 0, "spear"),
            soldier(3, 1, 6, 4, "spear"),
        ]),
        0,
    );
    assert_eq!(
        session.preview_attack(UnitId(1), UnitId(2)),
        Err(SessionError::FriendlyTarget(UnitId(2)))
    );
}

#[test]
fn lethal_attacks_end_the_match() {
    let mut session = MatchSession::new(
        content(vec![soldier(1, 0, 2, 2, "spear"), soldier(2, 1, 3, 2, "spear")]),
        11,
    );
    session.on_build().unwrap();
    let mut combat = session.subscribe(Topic::Combat);
    let mut turn = session.subscribe(Topic::Turn);

    let report = session.queue_attack(UnitId(1), UnitId(2)).unwrap();
    assert_eq!(report.chance, 100);
    assert_eq!(session.on_tick(), Ok(TickOutcome::Completed));
    assert_eq!(session.unit(UnitId(2)).unwrap().health(), 2);
    assert_eq!(session.winner(), None);

    session.queue_attack(UnitId(1), UnitId(2)).unwrap();
    assert_eq!(session.on_tick(), Ok(TickOutcome::Completed));

    let target = session.unit(UnitId(2)).unwrap();
    assert_eq!(target.health(), 0);
    assert!(!target.is_alive());
    assert_eq!(session.winner(), Some(TeamId(0)));
    assert!(session.is_finished());
    assert_eq!(session.on_tick(), Err(SessionError::MatchFinished));

    let events = drain(&mut combat);
    let deaths = events
        .iter()
        .filter(|event| matches!(event, GameEvent::UnitDied { .. }))
        .count();
    assert_eq!(deaths, 1);
    assert!(matches!(
        events[1],
        GameEvent::AttackResolved { dealt: 2, .. }
    ));

    assert!(drain(&mut turn).iter().any(|event| *event
        == GameEvent::MatchEnded {
            winner: Some(TeamId(0)),
            rounds: 0
        }));
}

#[test]
fn attacks_spend_ammo_and_points() {
    let mut session = duel();
    session.end_turn().unwrap();

    session.queue_attack(UnitId(2), UnitId(1)).unwrap();
    session.on_tick().unwrap();

    let archer = session.unit(UnitId(2)).unwrap();
    assert_eq!(archer.action_points(), 3);
    assert_eq!(archer.ammo("arrows"), 0);

    assert!(matches!(
        session.queue_attack(UnitId(2), UnitId(1)),
        Err(SessionError::Unit(UnitError::InsufficientAmmo { .. }))
    ));
}

#[test]
fn turns_alternate_and_refresh_points() {
    let mut session = duel();
    session.queue_move(UnitId(1), Coordinate::new(1, 2)).unwrap();
    session.on_tick().unwrap();
    assert_eq!(session.unit(UnitId(1)).unwrap().action_points(), 3);

    assert_eq!(session.end_turn(), Ok(TeamId(1)));
    assert_eq!(session.turn().round, 0);
    assert_eq!(session.active_units(), vec![UnitId(2)]);

    assert_eq!(session.end_turn(), Ok(TeamId(0)));
    assert_eq!(session.turn().round, 1);
    assert_eq!(session.unit(UnitId(1)).unwrap().action_points(), 4);
}

/// Walks along a row without consulting the board or the other units.
struct RowPlanner;

impl PathPlanner for RowPlanner {
    fn plan(
        &self,
        _board: &Board,
        start: Coordinate,
        goal: Coordinate,
        _rules: &MovementRules,
    ) -> Option<Path> {
        if start.y != goal.y {
            return None;
        }
        let step = if goal.x >= start.x { 1 } else { -1 };
        let mut tiles = vec![start];
        let mut x = start.x;
        while x != goal.x {
            x += step;
            tiles.push(Coordinate::new(x, start.y));
        }
        Path::new(tiles)
    }
}

#[test]
fn move_into_an_occupied_tile_is_interrupted() {
    let mut session = MatchSession::new(
        content(vec![
            soldier(1, 0, 0, 2, "spear"),
            soldier(3, 0, 2, 2, "spear"),
            soldier(2, 1, 6, 2, "spear"),
        ]),
        0,
    )
    .with_planner(RowPlanner);
    session.on_build().unwrap();
    let mut turn_events = session.subscribe(Topic::Turn);

    let plan = session.queue_move(UnitId(1), Coordinate::new(3, 2)).unwrap();
    assert!(plan.path.tiles().contains(&Coordinate::new(2, 2)));

    assert_eq!(session.on_tick(), Ok(TickOutcome::Advanced));
    assert_eq!(session.on_tick(), Ok(TickOutcome::Interrupted));
    assert!(session.pending_action().is_none());
    assert_eq!(session.on_tick(), Ok(TickOutcome::Idle));

    let unit = session.unit(UnitId(1)).unwrap();
    assert_eq!(unit.position, Coordinate::new(1, 2));
    assert_eq!(unit.action_points(), 3);
    assert_eq!(session.unit(UnitId(3)).unwrap().position, Coordinate::new(2, 2));

    assert_eq!(
        drain(&mut turn_events),
        vec![GameEvent::ActionAborted {
            unit: UnitId(1),
            action: AbortedAction::Move {
                at: Coordinate::new(1, 2),
                skipped: 2
            }
        }]
    );

    assert_eq!(
        session.queue_move(UnitId(1), Coordinate::new(1, 0)).unwrap_err(),
        SessionError::NoPath {
            from: Coordinate::new(1, 2),
            to: Coordinate::new(1, 0)
        }
    );
}

#[test]
fn aborting_a_queued_attack_resolves_nothing() {
    let mut session = MatchSession::new(
        content(vec![soldier(1, 0, 2, 2, "spear"), soldier(2, 1, 3, 2, "spear")]),
        3,
    );
    session.on_build().unwrap();
    let mut combat = session.subscribe(Topic::Combat);
    let mut turn_events = session.subscribe(Topic::Turn);

    session.queue_attack(UnitId(1), UnitId(2)).unwrap();
    assert_eq!(
        session.abort_action(),
        Ok(AbortedAction::Attack {
            target: UnitId(2)
        })
    );
    assert_eq!(session.on_tick(), Ok(TickOutcome::Idle));

    assert_eq!(session.unit(UnitId(1)).unwrap().action_points(), 4);
    assert_eq!(session.unit(UnitId(2)).unwrap().health(), 5);
    assert_eq!(session.turn().nonce, 0);
    assert!(drain(&mut combat).is_empty());
    assert_eq!(
        drain(&mut turn_events),
        vec![GameEvent::ActionAborted {
            unit: UnitId(1),
            action: AbortedAction::Attack {
                target: UnitId(2)
            }
        }]
    );
}

#[test]
fn queued_attack_is_checked_again_when_it_resolves() {
    let mut session = MatchSession::new(
        content(vec![
            soldier(1, 0, 2, 2, "spear"),
            soldier(3, 0, 0, 0, "spear"),
            soldier(2, 1, 3, 2, "spear"),
        ]),
        5,
    );
    session.on_build().unwrap();
    let mut combat = session.subscribe(Topic::Combat);

    session.queue_attack(UnitId(1), UnitId(2)).unwrap();
    let applied = session.apply_environment_damage(UnitId(1), 9).unwrap();
    assert!(applied.died);
    assert_eq!(applied.dealt, 5);
    assert!(!session.is_finished());

    assert_eq!(session.on_tick(), Err(SessionError::UnitDead(UnitId(1))));
    assert!(session.pending_action().is_none());
    assert_eq!(session.unit(UnitId(2)).unwrap().health(), 5);
    assert_eq!(session.turn().nonce, 0);

    let events = drain(&mut combat);
    assert_eq!(
        events[0],
        GameEvent::UnitDied {
            unit: UnitId(1),
            killer: None
        }
    );
    assert!(matches!(
        &events[1..],
        [GameEvent::AttackRejected {
            attacker: UnitId(1),
            target: UnitId(2),
            ..
        }]
    ));
}

#[test]
fn environment_damage_can_end_the_match() {
    let mut session = duel();
    let mut turn_events = session.subscribe(Topic::Turn);

    let applied = session.apply_environment_damage(UnitId(2), 99).unwrap();
    assert_eq!(applied.dealt, 5);
    assert_eq!(session.winner(), Some(TeamId(0)));
    assert!(session.is_finished());

    let repeat = session.apply_environment_damage(UnitId(2), 1);
    assert_eq!(repeat.unwrap_err(), SessionError::MatchFinished);
    assert!(drain(&mut turn_events).contains(&GameEvent::MatchEnded {
        winner: Some(TeamId(0)),
        rounds: 0
    }));
}
