//! Full matches against an in-process runner built on the simulator.

use agent::ai::Heuristic;
use agent::entity::{Food, Fragment};
use agent::sim::{Intent, Simulator};
use agent::{Config, Diagnostics, Rules, Strategy, TimeManager};
use glam::DVec2;
use protocol::{LineReader, LineWriter, MineData, ObjectData, ObjectKind, TurnInput, TurnOutput};
use std::io::Cursor;

const CONFIG_LINE: &str = r#"{"GAME_WIDTH":660,"GAME_HEIGHT":660,"GAME_TICKS":200,"FOOD_MASS":1.0,"MAX_FRAGS_CNT":10,"TICKS_TIL_FUSION":250,"VIRUS_RADIUS":22,"VIRUS_SPLIT_MASS":80,"VISCOSITY":0.25,"INERTION_FACTOR":10,"SPEED_FACTOR":25}"#;

/// The runner's view of slot 0 as the agent would receive it.
fn observe(sim: &Simulator) -> TurnInput {
    let mine = sim.players[0]
        .fragments
        .iter()
        .map(|f| MineData {
            id: format!("{}.{}", f.owner, f.sub_id),
            x: f.position.x,
            y: f.position.y,
            sx: f.velocity().x,
            sy: f.velocity().y,
            r: f.radius,
            m: f.mass,
            ttf: (f.fuse_timer > 0).then_some(f.fuse_timer),
        })
        .collect();

    let mut objects: Vec<ObjectData> = sim
        .foods
        .iter()
        .map(|food| ObjectData {
            id: None,
            owner: None,
            kind: ObjectKind::Food,
            x: food.position.x,
            y: food.position.y,
            r: None,
            m: None,
        })
        .collect();
    for player in &sim.players[1..] {
        for f in player.fragments.iter() {
            objects.push(ObjectData {
                id: Some(format!("{}.{}", f.owner, f.sub_id)),
                owner: None,
                kind: ObjectKind::Player,
                x: f.position.x,
                y: f.position.y,
                r: Some(f.radius),
                m: Some(f.mass),
            });
        }
    }
    TurnInput { mine, objects }
}

fn arena() -> Simulator {
    let mut sim = Simulator::default();
    sim.players[0]
        .fragments
        .push(Fragment::new(1, 0, DVec2::new(330.0, 330.0), 40.0));
    sim.players[1]
        .fragments
        .push(Fragment::new(2, 0, DVec2::new(80.0, 580.0), 40.0));
    for i in 0..12 {
        let angle = i as f64 * std::f64::consts::TAU / 12.0;
        let distance = 30.0 + 5.0 * i as f64;
        sim.foods
            .push(Food::new(DVec2::new(330.0, 330.0) + DVec2::from_angle(angle) * distance));
    }
    sim
}

/// Play `ticks` ticks; the opponent follows the heuristic.
fn play(strategy: &mut Strategy, rules: &Rules, ticks: u32) -> (Simulator, Vec<TurnOutput>) {
    let config = Config::default();
    let time = TimeManager::new(ticks, &config.time);
    let mut sim = arena();
    let mut outputs = Vec::new();
    for _ in 0..ticks {
        let output = strategy.on_tick(&observe(&sim), &time);
        let mut intents = Heuristic.intents(&sim, 0, rules, &[]);
        intents[0] = Some(Intent {
            target: DVec2::new(output.x, output.y),
            split: output.split,
            eject: output.eject,
        });
        sim.tick(rules, &[], &intents);
        outputs.push(output);
    }
    (sim, outputs)
}

#[test]
fn test_lookahead_collects_food() {
    let rules = Rules::default();
    let mut strategy = Strategy::from_name("sim_5", rules.clone(), &Config::default()).unwrap();
    let (sim, outputs) = play(&mut strategy, &rules, 60);

    assert!(sim.players[0].total_mass() > 40.0, "no food eaten: {:?}", sim.players[0]);
    for out in &outputs {
        assert!((0.0..=rules.width).contains(&out.x) && (0.0..=rules.height).contains(&out.y));
        assert!(out.debug.is_some());
    }
}

#[test]
fn test_same_seed_same_match() {
    let rules = Rules::default();
    let mut config = Config::default();
    config.search.monte_carlo_max_rollouts = 40;
    let mut first = Strategy::from_name("monte_carlo", rules.clone(), &config).unwrap();
    let mut second = Strategy::from_name("monte_carlo", rules.clone(), &config).unwrap();
    let (_, a) = play(&mut first, &rules, 20);
    let (_, b) = play(&mut second, &rules, 20);
    let moves = |outs: &[TurnOutput]| -> Vec<(f64, f64, bool, bool)> {
        outs.iter().map(|o| (o.x, o.y, o.split, o.eject)).collect()
    };
    assert_eq!(moves(&a), moves(&b));
}

#[test]
fn test_line_protocol_session() {
    let turn = serde_json::to_string(&serde_json::json!({
        "Mine": [{"Id": "1", "X": 100.0, "Y": 100.0, "SX": 0.0, "SY": 0.0, "R": 12.649, "M": 40.0}],
        "Objects": [{"T": "F", "X": 140.0, "Y": 100.0}]
    }))
    .unwrap();
    let input = format!("{CONFIG_LINE}\n{turn}\n\n{turn}\n");

    let config = Config::default();
    let mut reader = LineReader::new(Cursor::new(input));
    let game = reader.read_config().unwrap();
    assert_eq!(game.ticks, 200);

    let rules = Rules::from(&game);
    let mut strategy = Strategy::from_name("nearest_food", rules, &config)
        .unwrap()
        .with_diagnostics(Diagnostics::recording());
    let mut time = TimeManager::new(game.ticks, &config.time);
    let mut writer = LineWriter::new(Vec::new());
    while let Some(turn) = reader.read_turn().unwrap() {
        time.tick_started();
        let output = strategy.on_tick(&turn, &time);
        writer.write_output(&output).unwrap();
        time.tick_finished();
    }
    assert_eq!(time.ticks_passed(), 2);
    assert_eq!(strategy.diagnostics().lines().len(), 2);

    let written = String::from_utf8(writer.into_inner()).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let out: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(out["X"].as_f64().unwrap() > 100.0);
        assert_eq!(out["Split"], false);
        assert!(out["Debug"].is_string());
    }
}
