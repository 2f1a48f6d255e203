//! Collision layers and the interaction table between entity kinds.
//!
//! Each kind gets one rapier group as its membership and a filter of the
//! groups it collides with. Bullets have no bodies; their row documents the
//! gameplay overlap tests that stand in for them.

use rapier3d::prelude::{Group, InteractionGroups};

use arena_core::enums::EntityKind;

pub const ENVIRONMENT: Group = Group::GROUP_1;
pub const PLAYER: Group = Group::GROUP_2;
pub const ENEMY: Group = Group::GROUP_3;
pub const POWER_UP: Group = Group::GROUP_4;
pub const BULLET: Group = Group::GROUP_5;

/// Membership group of a kind.
pub fn layer_of(kind: EntityKind) -> Group {
    match kind {
        EntityKind::Environment => ENVIRONMENT,
        EntityKind::Player => PLAYER,
        EntityKind::Enemy => ENEMY,
        EntityKind::PowerUp => POWER_UP,
        EntityKind::Bullet => BULLET,
    }
}

/// The interaction table.
///
/// | kind        | collides with                       |
/// |-------------|-------------------------------------|
/// | Environment | Player, Enemy                       |
/// | Player      | Environment, Enemy, PowerUp, Bullet |
/// | Enemy       | Environment, Player, Bullet         |
/// | PowerUp     | Player                              |
/// | Bullet      | Player, Enemy                       |
pub fn interaction_groups(kind: EntityKind) -> InteractionGroups {
    let filter = match kind {
        EntityKind::Environment => PLAYER | ENEMY,
        EntityKind::Player => ENVIRONMENT | ENEMY | POWER_UP | BULLET,
        EntityKind::Enemy => ENVIRONMENT | PLAYER | BULLET,
        EntityKind::PowerUp => PLAYER,
        EntityKind::Bullet => PLAYER | ENEMY,
    };
    InteractionGroups::new(layer_of(kind), filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [EntityKind; 5] = [
        EntityKind::Environment,
        EntityKind::Player,
        EntityKind::Enemy,
        EntityKind::PowerUp,
        EntityKind::Bullet,
    ];

    #[test]
    fn test_table_is_symmetric() {
        for a in KINDS {
            for b in KINDS {
                let ga = interaction_groups(a);
                let gb = interaction_groups(b);
                assert_eq!(
                    ga.filter.contains(gb.memberships),
                    gb.filter.contains(ga.memberships),
                    "asymmetric entry {a:?}/{b:?}"
                );
            }
        }
    }

    #[test]
    fn test_power_ups_only_touch_the_player() {
        let power_up = interaction_groups(EntityKind::PowerUp);
        for kind in KINDS {
            let expected = kind == EntityKind::Player;
            assert_eq!(power_up.test(interaction_groups(kind)), expected, "{kind:?}");
        }
    }

    #[test]
    fn test_enemies_do_not_collide_with_each_other() {
        let enemy = interaction_groups(EntityKind::Enemy);
        assert!(!enemy.test(enemy));
    }
}
