//! Built-in starter set
//!
//! Card texts compiled into the binary so the demo driver and tests run
//! without any on-disk card folder.

use crate::loader::CardTemplate;
use crate::Result;

/// Card texts for the starter set, in the loader's `Key:Value` format.
pub const STARTER_SET: &[&str] = &[
    "Name:Ember Whelp\nCategory:Field\nCost:1\nStats:3/2/2\n",
    "Name:Stone Bulwark\nCategory:Field\nCost:2\nStats:1/1/5\nAbility:cont tussle-guard\n",
    "Name:Pack Matriarch\nCategory:Field\nCost:3\nStats:2/1/3\nAbility:cont strength +1 own-field\n",
    "Name:Swiftclaw\nCategory:Field\nCost:3\nStats:4/2/2\nAbility:cont tussle-win\n",
    "Name:Gravecaller\nCategory:Field\nCost:4\nStats:1/1/4\nAbility:act 2 revive target own-inactive\n",
    "Name:Scrap Hulk\nCategory:Field\nCost:5\nStats:1/4/6\nAbility:cont cost -1 per-inactive\n",
    "Name:Bone Martyr\nCategory:Field\nCost:2\nStats:2/1/2\nAbility:trig on-defeat damage 1 all enemy-field\n",
    "Name:Mimic\nCategory:Field\nCost:2\nStats:2/1/3\nAbility:act 1 copy-ability target enemy-field\n",
    "Name:Grimfang Alpha\nCategory:Field\nCost:6\nStats:3/4/5\n",
    "Name:Bone Saw\nCategory:Instantaneous\nCost:2\nAbility:inst damage 3 target enemy-field\n",
    "Name:Mend\nCategory:Instantaneous\nCost:1\nAbility:inst restore 2 target own-field\n",
    "Name:Puppeteer's Strings\nCategory:Instantaneous\nCost:5\nAbility:inst take-control target enemy-field\n",
    "Name:Second Wind\nCategory:Instantaneous\nCost:0\nAbility:inst gain-cc 1\n",
];

/// Deck list used by the demo driver when none is supplied.
pub const DEMO_DECK: &[&str] = &[
    "Ember Whelp",
    "Ember Whelp",
    "Stone Bulwark",
    "Pack Matriarch",
    "Swiftclaw",
    "Bone Martyr",
    "Bone Saw",
    "Mend",
    "Gravecaller",
    "Grimfang Alpha",
];

/// Parse the whole starter set. Any malformed text or ability string is a
/// configuration error.
pub fn starter_set() -> Result<Vec<CardTemplate>> {
    STARTER_SET.iter().map(|text| CardTemplate::parse(text)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects;

    #[test]
    fn test_starter_set_parses() {
        let set = starter_set().unwrap();
        assert_eq!(set.len(), STARTER_SET.len());
    }

    #[test]
    fn test_starter_set_abilities_validate() {
        for template in starter_set().unwrap() {
            effects::validate_description(&template.ability)
                .unwrap_or_else(|e| panic!("{}: {e}", template.name));
        }
    }

    #[test]
    fn test_demo_deck_names_exist() {
        let set = starter_set().unwrap();
        for name in DEMO_DECK {
            assert!(
                set.iter().any(|t| t.name == *name),
                "unknown deck entry {name}"
            );
        }
    }
}
