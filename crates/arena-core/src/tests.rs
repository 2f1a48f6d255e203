#[cfg(test)]
mod tests {
    use glam::Vec3;

    use crate::commands::PlayerCommand;
    use crate::config::*;
    use crate::constants::*;
    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::types::*;

    // ---- Config tables ----

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        for kind in EnemyType::ALL {
            assert!(config.enemy(kind).is_some(), "missing enemy {kind:?}");
        }
        for kind in PowerUpKind::DROPPABLE {
            assert!(config.power_up(kind).is_some(), "missing power-up {kind:?}");
        }
        assert_eq!(config.weapons[0].id, "pistol");
    }

    #[test]
    fn test_config_json_reload_matches_default() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let loaded = GameConfig::from_json(&json).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_config_rejects_empty_weapons() {
        let mut config = GameConfig::default();
        config.weapons.clear();
        let json = serde_json::to_string(&config).unwrap();
        assert!(matches!(
            GameConfig::from_json(&json),
            Err(ConfigError::NoWeapons)
        ));
    }

    #[test]
    fn test_config_rejects_duplicate_weapon() {
        let mut config = GameConfig::default();
        let dup = config.weapons[0].clone();
        config.weapons.push(dup);
        match config.validate() {
            Err(ConfigError::DuplicateWeapon(id)) => assert_eq!(id, "pistol"),
            other => panic!("expected duplicate weapon error, got {other:?}"),
        }
    }

    #[test]
    fn test_config_rejects_bad_drop_chance() {
        let mut config = GameConfig::default();
        config.enemies.get_mut("basic").unwrap().drop_chance = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "drop_chance",
                ..
            })
        ));
    }

    #[test]
    fn test_config_rejects_malformed_json() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_table_entry_is_none() {
        let mut config = GameConfig::default();
        config.power_ups.remove("shield");
        assert!(config.power_up(PowerUpKind::Shield).is_none());
        assert!(config.weapon("railgun").is_none());
    }

    #[test]
    fn test_missing_entries_fall_back_to_minimal() {
        let mut config = GameConfig::default();
        config.power_ups.remove("shield");
        config.enemies.remove("tank");

        assert_eq!(config.power_up_or_minimal(PowerUpKind::Shield), PowerUpConfig::minimal());
        assert_eq!(*config.enemy_or_minimal(EnemyType::Tank), EnemyConfig::minimal());
        assert!(matches!(
            config.enemy_or_minimal(EnemyType::Basic),
            std::borrow::Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_attack_distance_by_archetype() {
        let config = GameConfig::default();
        let shooter = config.enemy(EnemyType::Shooter).unwrap();
        let basic = config.enemy(EnemyType::Basic).unwrap();
        assert_eq!(shooter.attack_distance(), shooter.shoot_distance);
        assert_eq!(basic.attack_distance(), basic.melee_range);
    }

    // ---- Game state graph ----

    #[test]
    fn test_game_state_reversible_pause() {
        assert!(GameState::Playing.can_transition_to(GameState::Paused));
        assert!(GameState::Paused.can_transition_to(GameState::Playing));
    }

    #[test]
    fn test_game_state_wave_cycle() {
        assert!(GameState::Playing.can_transition_to(GameState::WaveTransition));
        assert!(GameState::WaveTransition.can_transition_to(GameState::Playing));
    }

    #[test]
    fn test_game_state_session_resets_are_one_way() {
        assert!(GameState::Title.can_transition_to(GameState::WaveTransition));
        assert!(GameState::GameOver.can_transition_to(GameState::WaveTransition));
        assert!(!GameState::WaveTransition.can_transition_to(GameState::Title));
        assert!(!GameState::Playing.can_transition_to(GameState::Title));
        assert!(!GameState::Title.can_transition_to(GameState::Playing));
        assert!(!GameState::Paused.can_transition_to(GameState::WaveTransition));
    }

    #[test]
    fn test_only_playing_states_simulate() {
        assert!(GameState::Playing.runs_simulation());
        assert!(GameState::WaveTransition.runs_simulation());
        assert!(!GameState::Paused.runs_simulation());
        assert!(!GameState::Title.runs_simulation());
        assert!(!GameState::GameOver.runs_simulation());
        assert!(!GameState::Loading.runs_simulation());
    }

    // ---- Geometry ----

    #[test]
    fn test_bounding_sphere_overlap_with_skin() {
        let a = BoundingSphere::new(Vec3::ZERO, 0.5);
        let b = BoundingSphere::new(Vec3::new(1.05, 0.0, 0.0), 0.5);
        assert!(!a.intersects(&b, 0.0));
        assert!(a.intersects(&b, CONTACT_SKIN));
    }

    #[test]
    fn test_facing_rotation_points_forward() {
        for dir in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z, Vec3::new(1.0, 0.0, 1.0)] {
            let t = Transform::new(Vec3::ZERO, facing_rotation(dir));
            let expected = horizontal(dir).normalize();
            assert!(
                t.forward().distance(expected) < 1e-5,
                "facing {dir:?} produced forward {:?}",
                t.forward()
            );
        }
    }

    #[test]
    fn test_facing_rotation_degenerate_is_identity() {
        assert_eq!(facing_rotation(Vec3::Y), glam::Quat::IDENTITY);
        assert_eq!(facing_rotation(Vec3::ZERO), glam::Quat::IDENTITY);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..TICK_RATE {
            time.advance(DT);
        }
        assert_eq!(time.tick, TICK_RATE as u64);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_effect_slots() {
        let a = EffectKind::SpeedBoost { multiplier: 1.5 };
        let b = EffectKind::SpeedBoost { multiplier: 2.0 };
        assert!(a.same_slot(&b));
        assert!(!a.same_slot(&EffectKind::Shield));
    }

    #[test]
    fn test_player_command_tagged_json() {
        let json = serde_json::to_string(&PlayerCommand::AssetLoadFailed {
            reason: "missing".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"AssetLoadFailed","reason":"missing"}"#);
    }
}
