use crate::error::{BiteCastError, Result};
use crate::models::{
    CloudPreference, SeasonalModifiers, SpeciesGroup, SpeciesProfile, TimePeriod, WeatherWeights,
};

use TimePeriod::*;

const fn weights(pressure: f64, temperature: f64, cloud_cover: f64, precipitation: f64, wind: f64) -> WeatherWeights {
    WeatherWeights {
        pressure,
        temperature,
        cloud_cover,
        precipitation,
        wind,
    }
}

const fn cloud(overcast: f64, clear: f64) -> CloudPreference {
    CloudPreference { overcast, clear }
}

const fn seasons(early_ice: f64, mid_winter: f64, late_ice: f64) -> SeasonalModifiers {
    SeasonalModifiers {
        early_ice,
        mid_winter,
        late_ice,
    }
}

static PROFILES: [SpeciesProfile; 20] = [
    SpeciesProfile {
        id: "walleye",
        name: "Walleye",
        scientific_name: "Sander vitreus",
        group: SpeciesGroup::Walleye,
        description: "Low-light predator that roams breaklines and mud flats under the ice.",
        ice_tip: "Jig a spoon near bottom on the first break at dawn and dusk.",
        time_of_day: &[
            (Dawn, 15.0),
            (Morning, 3.0),
            (Midday, -6.0),
            (Afternoon, -2.0),
            (LateAfternoon, 6.0),
            (Dusk, 15.0),
            (EarlyNight, 5.0),
            (LateNight, -2.0),
        ],
        weights: weights(1.2, 1.0, 1.1, 1.0, 1.0),
        cloud: cloud(5.0, -4.0),
        seasonal: seasons(8.0, -3.0, 6.0),
        night_feeder: true,
        moon_sensitivity: 0.6,
        day_length_sensitivity: 1.0,
    },
    SpeciesProfile {
        id: "sauger",
        name: "Sauger",
        scientific_name: "Sander canadensis",
        group: SpeciesGroup::Walleye,
        description: "River-loving cousin of the walleye, even more light-shy.",
        ice_tip: "Fish deep holes near current seams with a minnow on a dead stick.",
        time_of_day: &[
            (Dawn, 12.0),
            (Morning, 2.0),
            (Midday, -6.0),
            (Afternoon, -2.0),
            (LateAfternoon, 5.0),
            (Dusk, 14.0),
            (EarlyNight, 6.0),
        ],
        weights: weights(1.1, 1.0, 1.2, 1.0, 0.8),
        cloud: cloud(6.0, -5.0),
        seasonal: seasons(6.0, -2.0, 7.0),
        night_feeder: true,
        moon_sensitivity: 0.5,
        day_length_sensitivity: 0.8,
    },
    SpeciesProfile {
        id: "northernPike",
        name: "Northern Pike",
        scientific_name: "Esox lucius",
        group: SpeciesGroup::Pike,
        description: "Sight-feeding ambush predator that patrols weed edges all day.",
        ice_tip: "Set tip-ups with large suckers over shallow weed flats.",
        time_of_day: &[
            (Dawn, 5.0),
            (Morning, 8.0),
            (Midday, 6.0),
            (Afternoon, 4.0),
            (LateAfternoon, 3.0),
            (Dusk, 2.0),
            (EarlyNight, -8.0),
            (LateNight, -10.0),
        ],
        weights: weights(1.0, 0.8, 0.8, 0.9, 1.0),
        cloud: cloud(-2.0, 4.0),
        seasonal: seasons(10.0, 0.0, 8.0),
        night_feeder: false,
        moon_sensitivity: 0.0,
        day_length_sensitivity: 1.2,
    },
    SpeciesProfile {
        id: "muskellunge",
        name: "Muskellunge",
        scientific_name: "Esox masquinongy",
        group: SpeciesGroup::Pike,
        description: "Rarely targeted through the ice; feeds in short, unpredictable bursts.",
        ice_tip: "Oversized quick-strike rigs on tip-ups near deep weed edges.",
        time_of_day: &[
            (Morning, 4.0),
            (Midday, 5.0),
            (Afternoon, 4.0),
            (EarlyNight, -6.0),
            (LateNight, -8.0),
        ],
        weights: weights(1.3, 1.0, 0.7, 0.8, 0.8),
        cloud: cloud(2.0, 1.0),
        seasonal: seasons(6.0, -6.0, 3.0),
        night_feeder: false,
        moon_sensitivity: 0.0,
        day_length_sensitivity: 0.8,
    },
    SpeciesProfile {
        id: "yellowPerch",
        name: "Yellow Perch",
        scientific_name: "Perca flavescens",
        group: SpeciesGroup::Panfish,
        description: "Schooling daytime feeder on soft-bottom basins.",
        ice_tip: "Move often and drop a small jigging spoon tipped with a minnow head.",
        time_of_day: &[
            (Dawn, 2.0),
            (Morning, 8.0),
            (Midday, 6.0),
            (Afternoon, 6.0),
            (LateAfternoon, 2.0),
            (Dusk, -2.0),
            (EarlyNight, -10.0),
            (LateNight, -12.0),
        ],
        weights: weights(0.9, 0.9, 0.7, 0.8, 1.0),
        cloud: cloud(-1.0, 3.0),
        seasonal: seasons(6.0, 2.0, 8.0),
        night_feeder: false,
        moon_sensitivity: 0.0,
        day_length_sensitivity: 1.0,
    },
    SpeciesProfile {
        id: "bluegill",
        name: "Bluegill",
        scientific_name: "Lepomis macrochirus",
        group: SpeciesGroup::Panfish,
        description: "Suspends over weeds and feeds on zooplankton in daylight.",
        ice_tip: "Tiny tungsten jig with spikes, watch for light bites on the way down.",
        time_of_day: &[
            (Dawn, -2.0),
            (Morning, 6.0),
            (Midday, 8.0),
            (Afternoon, 6.0),
            (LateAfternoon, 2.0),
            (Dusk, -2.0),
            (EarlyNight, -12.0),
            (LateNight, -14.0),
        ],
        weights: weights(0.8, 1.1, 0.8, 0.7, 0.9),
        cloud: cloud(-2.0, 4.0),
        seasonal: seasons(7.0, 0.0, 7.0),
        night_feeder: false,
        moon_sensitivity: 0.0,
        day_length_sensitivity: 1.1,
    },
    SpeciesProfile {
        id: "pumpkinseed",
        name: "Pumpkinseed",
        scientific_name: "Lepomis gibbosus",
        group: SpeciesGroup::Panfish,
        description: "Shallow-water sunfish that stays near vegetation all winter.",
        ice_tip: "Fish the shallow weed pockets with waxworms at midday.",
        time_of_day: &[
            (Morning, 5.0),
            (Midday, 8.0),
            (Afternoon, 5.0),
            (Dusk, -3.0),
            (EarlyNight, -12.0),
            (LateNight, -14.0),
        ],
        weights: weights(0.8, 1.2, 0.8, 0.7, 0.9),
        cloud: cloud(-2.0, 4.0),
        seasonal: seasons(6.0, -2.0, 6.0),
        night_feeder: false,
        moon_sensitivity: 0.0,
        day_length_sensitivity: 1.2,
    },
    SpeciesProfile {
        id: "blackCrappie",
        name: "Black Crappie",
        scientific_name: "Pomoxis nigromaculatus",
        group: SpeciesGroup::Panfish,
        description: "Suspended schooling panfish that feeds heavily at low light.",
        ice_tip: "Watch the flasher for suspended fish and fish just above them at dusk.",
        time_of_day: &[
            (Dawn, 8.0),
            (Morning, 2.0),
            (Midday, -4.0),
            (LateAfternoon, 4.0),
            (Dusk, 14.0),
            (EarlyNight, 8.0),
            (LateNight, 2.0),
        ],
        weights: weights(1.0, 0.9, 1.0, 0.8, 0.9),
        cloud: cloud(4.0, -3.0),
        seasonal: seasons(7.0, 1.0, 8.0),
        night_feeder: true,
        moon_sensitivity: 0.8,
        day_length_sensitivity: 0.8,
    },
    SpeciesProfile {
        id: "whiteCrappie",
        name: "White Crappie",
        scientific_name: "Pomoxis annularis",
        group: SpeciesGroup::Panfish,
        description: "Turbid-water crappie, a little less light-sensitive than the black.",
        ice_tip: "Small minnows under a slip bobber near brush piles.",
        time_of_day: &[
            (Dawn, 7.0),
            (Morning, 3.0),
            (Midday, -2.0),
            (LateAfternoon, 4.0),
            (Dusk, 12.0),
            (EarlyNight, 6.0),
        ],
        weights: weights(1.0, 1.0, 0.9, 0.8, 0.9),
        cloud: cloud(3.0, -2.0),
        seasonal: seasons(6.0, 0.0, 7.0),
        night_feeder: true,
        moon_sensitivity: 0.6,
        day_length_sensitivity: 0.8,
    },
    SpeciesProfile {
        id: "largemouthBass",
        name: "Largemouth Bass",
        scientific_name: "Micropterus salmoides",
        group: SpeciesGroup::Bass,
        description: "Sluggish in cold water; holds tight to green weeds and bites on warm afternoons.",
        ice_tip: "Slow-fished jigging rap or a dead stick minnow in remaining green weeds.",
        time_of_day: &[
            (Morning, 2.0),
            (Midday, 5.0),
            (Afternoon, 6.0),
            (LateAfternoon, 3.0),
            (EarlyNight, -6.0),
            (LateNight, -8.0),
        ],
        weights: weights(1.1, 1.4, 0.8, 0.8, 0.8),
        cloud: cloud(-1.0, 3.0),
        seasonal: seasons(2.0, -8.0, 3.0),
        night_feeder: false,
        moon_sensitivity: 0.0,
        day_length_sensitivity: 1.0,
    },
    SpeciesProfile {
        id: "smallmouthBass",
        name: "Smallmouth Bass",
        scientific_name: "Micropterus dolomieu",
        group: SpeciesGroup::Bass,
        description: "Schools on deep rock in winter and feeds sparingly.",
        ice_tip: "Hair jig or blade bait over deep rock humps, fished very slowly.",
        time_of_day: &[
            (Morning, 3.0),
            (Midday, 5.0),
            (Afternoon, 4.0),
            (EarlyNight, -6.0),
            (LateNight, -8.0),
        ],
        weights: weights(1.2, 1.3, 0.8, 0.8, 0.9),
        cloud: cloud(0.0, 3.0),
        seasonal: seasons(1.0, -7.0, 2.0),
        night_feeder: false,
        moon_sensitivity: 0.0,
        day_length_sensitivity: 0.9,
    },
    SpeciesProfile {
        id: "rockBass",
        name: "Rock Bass",
        scientific_name: "Ambloplites rupestris",
        group: SpeciesGroup::Bass,
        description: "Rocky-shoreline sunfish, opportunistic and aggressive.",
        ice_tip: "Small jigs along rocky transitions in shallow water.",
        time_of_day: &[
            (Dawn, 4.0),
            (Morning, 5.0),
            (Midday, 3.0),
            (Dusk, 4.0),
            (EarlyNight, 2.0),
            (LateNight, -4.0),
        ],
        weights: weights(0.9, 1.1, 0.8, 0.8, 0.9),
        cloud: cloud(2.0, 1.0),
        seasonal: seasons(4.0, -3.0, 4.0),
        night_feeder: true,
        moon_sensitivity: 0.3,
        day_length_sensitivity: 0.8,
    },
    SpeciesProfile {
        id: "whiteBass",
        name: "White Bass",
        scientific_name: "Morone chrysops",
        group: SpeciesGroup::Bass,
        description: "Roaming schools that chase baitfish over open basins.",
        ice_tip: "Aggressive spoons over deep basins, follow the schools on the flasher.",
        time_of_day: &[
            (Dawn, 6.0),
            (Morning, 6.0),
            (Midday, 2.0),
            (LateAfternoon, 3.0),
            (Dusk, 6.0),
            (EarlyNight, -4.0),
            (LateNight, -6.0),
        ],
        weights: weights(1.1, 1.0, 0.9, 0.9, 1.1),
        cloud: cloud(2.0, 0.0),
        seasonal: seasons(5.0, -2.0, 5.0),
        night_feeder: false,
        moon_sensitivity: 0.0,
        day_length_sensitivity: 0.8,
    },
    SpeciesProfile {
        id: "channelCatfish",
        name: "Channel Catfish",
        scientific_name: "Ictalurus punctatus",
        group: SpeciesGroup::Catfish,
        description: "Near-dormant in cold water, wintering in deep holes.",
        ice_tip: "Cut bait on the bottom of deep wintering holes; expect few bites.",
        time_of_day: &[
            (Dawn, 1.0),
            (Midday, -4.0),
            (Dusk, 2.0),
            (EarlyNight, 1.0),
        ],
        weights: weights(0.9, 1.4, 0.6, 0.9, 0.7),
        cloud: cloud(0.0, -1.0),
        seasonal: seasons(-2.0, -8.0, 1.0),
        night_feeder: true,
        moon_sensitivity: 0.1,
        day_length_sensitivity: 0.3,
    },
    SpeciesProfile {
        id: "burbot",
        name: "Burbot",
        scientific_name: "Lota lota",
        group: SpeciesGroup::Other,
        description: "Cold-water cod relative that spawns under the ice and feeds at night.",
        ice_tip: "Glow spoons tipped with cut bait on hard bottom after dark.",
        time_of_day: &[
            (Dawn, 2.0),
            (Morning, -4.0),
            (Midday, -8.0),
            (Afternoon, -6.0),
            (Dusk, 8.0),
            (EarlyNight, 14.0),
            (LateNight, 12.0),
        ],
        weights: weights(0.8, 0.6, 0.5, 0.8, 0.7),
        cloud: cloud(2.0, -2.0),
        seasonal: seasons(3.0, 10.0, 5.0),
        night_feeder: true,
        moon_sensitivity: 1.0,
        day_length_sensitivity: 0.4,
    },
    SpeciesProfile {
        id: "lakeTrout",
        name: "Lake Trout",
        scientific_name: "Salvelinus namaycush",
        group: SpeciesGroup::Trout,
        description: "Cold-water char that cruises deep and rises to chase baits in winter.",
        ice_tip: "Tube jigs and large spoons over deep structure, reel away to trigger chases.",
        time_of_day: &[
            (Dawn, 6.0),
            (Morning, 8.0),
            (Midday, 4.0),
            (Afternoon, 3.0),
            (LateAfternoon, 2.0),
            (Dusk, 2.0),
            (EarlyNight, -8.0),
            (LateNight, -10.0),
        ],
        weights: weights(1.0, 0.6, 0.7, 0.7, 0.9),
        cloud: cloud(1.0, 2.0),
        seasonal: seasons(8.0, 6.0, 6.0),
        night_feeder: false,
        moon_sensitivity: 0.0,
        day_length_sensitivity: 0.8,
    },
    SpeciesProfile {
        id: "rainbowTrout",
        name: "Rainbow Trout",
        scientific_name: "Oncorhynchus mykiss",
        group: SpeciesGroup::Trout,
        description: "Stocked and wild fish that cruise shallow under the ice.",
        ice_tip: "Small spoons or powerbait just under the ice near inlets.",
        time_of_day: &[
            (Dawn, 8.0),
            (Morning, 8.0),
            (Midday, 2.0),
            (Afternoon, 2.0),
            (LateAfternoon, 3.0),
            (Dusk, 4.0),
            (EarlyNight, -8.0),
            (LateNight, -10.0),
        ],
        weights: weights(1.0, 0.8, 0.9, 1.0, 0.9),
        cloud: cloud(3.0, -1.0),
        seasonal: seasons(8.0, 3.0, 7.0),
        night_feeder: false,
        moon_sensitivity: 0.0,
        day_length_sensitivity: 0.9,
    },
    SpeciesProfile {
        id: "brookTrout",
        name: "Brook Trout",
        scientific_name: "Salvelinus fontinalis",
        group: SpeciesGroup::Trout,
        description: "Spring-fed pond char that feeds through the winter in shallow water.",
        ice_tip: "Waxworms on a small jig in shallow water near springs.",
        time_of_day: &[
            (Dawn, 8.0),
            (Morning, 7.0),
            (Midday, 2.0),
            (Afternoon, 2.0),
            (LateAfternoon, 3.0),
            (Dusk, 6.0),
            (EarlyNight, -8.0),
            (LateNight, -10.0),
        ],
        weights: weights(1.0, 0.7, 0.9, 0.9, 0.8),
        cloud: cloud(3.0, -2.0),
        seasonal: seasons(7.0, 4.0, 8.0),
        night_feeder: false,
        moon_sensitivity: 0.0,
        day_length_sensitivity: 1.0,
    },
    SpeciesProfile {
        id: "lakeWhitefish",
        name: "Lake Whitefish",
        scientific_name: "Coregonus clupeaformis",
        group: SpeciesGroup::Whitefish,
        description: "Bottom-feeding schooler of deep, clear lakes.",
        ice_tip: "Small jigging spoon with a dropper fly, pound bottom to raise silt.",
        time_of_day: &[
            (Dawn, 4.0),
            (Morning, 7.0),
            (Midday, 6.0),
            (Afternoon, 4.0),
            (Dusk, 0.0),
            (EarlyNight, -8.0),
            (LateNight, -10.0),
        ],
        weights: weights(0.9, 0.6, 0.6, 0.7, 1.0),
        cloud: cloud(0.0, 2.0),
        seasonal: seasons(5.0, 6.0, 6.0),
        night_feeder: false,
        moon_sensitivity: 0.0,
        day_length_sensitivity: 0.7,
    },
    SpeciesProfile {
        id: "cisco",
        name: "Cisco",
        scientific_name: "Coregonus artedi",
        group: SpeciesGroup::Whitefish,
        description: "Open-water plankton feeder that suspends in schools.",
        ice_tip: "Tiny spoons jigged aggressively to fish suspended on the flasher.",
        time_of_day: &[
            (Dawn, 5.0),
            (Morning, 6.0),
            (Midday, 4.0),
            (Afternoon, 3.0),
            (Dusk, 4.0),
            (EarlyNight, -6.0),
            (LateNight, -8.0),
        ],
        weights: weights(0.9, 0.7, 0.8, 0.7, 1.0),
        cloud: cloud(1.0, 1.0),
        seasonal: seasons(6.0, 4.0, 6.0),
        night_feeder: false,
        moon_sensitivity: 0.0,
        day_length_sensitivity: 0.8,
    },
];

/// Lookup over a slice of species profiles
#[derive(Debug, Clone, Copy)]
pub struct SpeciesCatalog {
    profiles: &'static [SpeciesProfile],
}

impl SpeciesCatalog {
    /// The built-in twenty species
    pub fn builtin() -> Self {
        Self::new(&PROFILES)
    }

    pub fn new(profiles: &'static [SpeciesProfile]) -> Self {
        Self { profiles }
    }

    pub fn get(&self, id: &str) -> Option<&'static SpeciesProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&'static SpeciesProfile> {
        self.get(id)
            .ok_or_else(|| BiteCastError::UnknownSpecies(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.profiles.iter().map(|p| p.id)
    }

    pub fn all(&self) -> &'static [SpeciesProfile] {
        self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for SpeciesCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
