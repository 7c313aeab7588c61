//! Built-in toy collection.

use super::definition::CharacterTemplate;
use super::rarity::Rarity;
use super::stats::CombatStats;
use crate::abilities::{Ability, EffectKind};

pub(crate) fn templates() -> Vec<CharacterTemplate> {
    use EffectKind::*;

    vec![
        CharacterTemplate::new("robo_fighter", "Robot Guardian", Rarity::Epic, 100)
            .with_stats(CombatStats::new(8, 6))
            .with_ability(Ability::new("laser_blast", "Laser Blast", Damage).with_damage(25).with_weight(0.45))
            .with_ability(Ability::new("shield_boost", "Shield Boost", Shield).with_shield(30).with_weight(0.45))
            .with_ability(
                Ability::new("recharge_batteries", "RECHARGE BATTERIES", HealReviveAll)
                    .with_heal(50)
                    .with_weight(0.10)
                    .ultimate(),
            ),
        CharacterTemplate::new("teddy_warrior", "Teddy Warrior", Rarity::Rare, 120)
            .with_ability(Ability::new("bear_hug", "Bear Hug", Damage).with_damage(20).with_weight(0.5))
            .with_ability(Ability::new("honey_heal", "Honey Heal", Heal).with_heal(30).with_weight(0.4))
            .with_ability(
                Ability::new("berserker_rage", "BERSERKER RAGE", Damage)
                    .with_damage(65)
                    .with_weight(0.1)
                    .ultimate(),
            ),
        CharacterTemplate::new("ninja_turtle", "Bath Turtle", Rarity::Common, 90)
            .with_ability(Ability::new("shuriken_throw", "Shuriken Throw", Damage).with_damage(22).with_weight(0.45))
            .with_ability(
                Ability::new("smoke_bomb", "Smoke Bomb", Mixed)
                    .with_damage(15)
                    .with_heal(15)
                    .with_weight(0.35),
            )
            .with_ability(
                Ability::new("shadow_clone_jutsu", "SHADOW CLONE JUTSU", MultiDamage)
                    .with_damage(35)
                    .with_hits(3)
                    .with_weight(0.08)
                    .ultimate(),
            ),
        CharacterTemplate::new("dragon_master", "Dragon Rider", Rarity::Legendary, 110)
            .with_ability(Ability::new("fire_breath", "Fire Breath", Damage).with_damage(28).with_weight(0.4))
            .with_ability(Ability::new("dragon_scales", "Dragon Scales", Heal).with_heal(25).with_weight(0.3))
            .with_ability(
                Ability::new("apocalypse_storm", "APOCALYPSE STORM", DamageAll)
                    .with_damage(120)
                    .with_weight(0.03)
                    .ultimate(),
            ),
        CharacterTemplate::new("unicorn_warrior", "Magic Unicorn", Rarity::Epic, 95)
            .with_ability(Ability::new("rainbow_blast", "Rainbow Blast", Damage).with_damage(24).with_weight(0.5))
            .with_ability(Ability::new("magic_shield", "Magic Shield", Shield).with_shield(20).with_weight(0.35))
            .with_ability(
                Ability::new("prismatic_storm", "PRISMATIC STORM", DamageAll)
                    .with_damage(40)
                    .with_weight(0.15)
                    .ultimate(),
            ),
        CharacterTemplate::new("squishy_alien", "Squishy Alien", Rarity::Common, 100)
            .with_ability(Ability::new("goo_blast", "Goo Blast", Damage).with_damage(26).with_weight(0.45))
            .with_ability(
                Ability::new("squish_and_bounce", "Squish and Bounce", Mixed)
                    .with_damage(20)
                    .with_heal(20)
                    .with_weight(0.35),
            )
            .with_ability(
                Ability::new("alien_stretch", "MEGA STRETCH", Damage)
                    .with_damage(75)
                    .with_weight(0.06)
                    .ultimate(),
            ),
        CharacterTemplate::new("pirate_captain", "Pirate Captain", Rarity::Common, 105)
            .with_ability(Ability::new("cannon_blast", "Cannon Blast", Damage).with_damage(30).with_weight(0.45))
            .with_ability(Ability::new("grog_heal", "Grog Heal", Heal).with_heal(28).with_weight(0.4))
            .with_ability(
                Ability::new("kraken_summon", "RELEASE THE KRAKEN", MultiDamage)
                    .with_damage(50)
                    .with_hits(2)
                    .with_weight(0.08)
                    .ultimate(),
            ),
        CharacterTemplate::new("wizard_toy", "Wizard Toy", Rarity::Legendary, 85)
            .with_ability(Ability::new("pyroblast", "Pyroblast", Damage).with_damage(35).with_weight(0.6))
            .with_ability(Ability::new("lightning_zap", "Lightning Zap", DamageChain).with_damage(25).with_weight(0.2))
            .with_ability(
                Ability::new("ice_nova", "ICE NOVA", FreezeAll)
                    .with_damage(15)
                    .with_weight(0.2)
                    .ultimate(),
            ),
        CharacterTemplate::new("phoenix_dragon", "Phoenix Dragon", Rarity::Mythic, 100)
            .with_ability(
                Ability::new("dragon_claw_strike", "Dragon Claw Strike", Damage)
                    .with_damage(30)
                    .with_weight(0.55),
            )
            .with_ability(
                Ability::new("inferno_wing_sweep", "Inferno Wing Sweep", Damage)
                    .with_damage(45)
                    .with_weight(0.35),
            )
            .with_ability(
                Ability::new("dragon_rebirth_apocalypse", "DRAGON REBIRTH APOCALYPSE", MixedAll)
                    .with_damage(200)
                    .with_heal(150)
                    .with_weight(0.10)
                    .ultimate(),
            ),
        CharacterTemplate::new("rubber_duckie", "Rubber Duckie", Rarity::Common, 85)
            .with_ability(Ability::new("splash_peck", "Splash Peck", Damage).with_damage(18).with_weight(0.5))
            .with_ability(
                Ability::new("soap_spray", "Soap Spray", DebuffAccuracy)
                    .with_damage(10)
                    .with_miss_chance(0.4)
                    .with_weight(0.4),
            )
            .with_ability(
                Ability::new("duck_swarm", "DUCK SWARM", DamageAll)
                    .with_damage(40)
                    .with_weight(0.1)
                    .ultimate(),
            ),
        CharacterTemplate::new("brick_dude", "Brick Dude", Rarity::Common, 90)
            .with_ability(Ability::new("sword_slash", "Sword Slash", Damage).with_damage(25).with_weight(0.35))
            .with_ability(Ability::new("block_defence", "Block Defence", ShieldAll).with_shield(15).with_weight(0.55))
            .with_ability(
                Ability::new("whirlwind_slash", "WHIRLWIND SLASH", DamageCascade)
                    .with_damage(35)
                    .with_cascade(vec![1.0, 0.6, 0.3])
                    .with_weight(0.1)
                    .ultimate(),
            ),
        CharacterTemplate::new("wind_up_soldier", "Wind-Up Soldier", Rarity::Common, 95)
            .with_ability(Ability::new("march_attack", "March Attack", Damage).with_damage(20).with_weight(0.5))
            .with_ability(
                Ability::new("wind_tension", "Wind Tension", BuffDamageAll)
                    .with_damage_buff(15)
                    .with_weight(0.25),
            )
            .with_ability(
                Ability::new("forward_march", "FORWARD MARCH", BuffCriticalAll)
                    .with_critical_boost(0.5, true)
                    .with_weight(0.25)
                    .ultimate(),
            ),
    ]
}
