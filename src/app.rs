use bitecast::config::Config;
use bitecast::logic::SpeciesCatalog;
use bitecast::models::{BiteForecast, SpeciesForecast, SpeciesProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Overview,
    Species,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Overview),
            '2' => Some(Screen::Species),
            _ => None,
        }
    }
}

/// Cursor over a list with a fixed upper bound
#[derive(Debug, Default, Clone, Copy)]
pub struct Selection {
    pub index: usize,
}

impl Selection {
    pub fn next(&mut self, max: usize) {
        if max > 0 && self.index < max - 1 {
            self.index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.index > 0 {
            self.index -= 1;
        }
    }

    pub fn clamp(&mut self, max: usize) {
        self.index = self.index.min(max.saturating_sub(1));
    }
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub config: Config,
    pub catalog: SpeciesCatalog,
    pub forecast: Option<BiteForecast>,

    pub species_selection: Selection,
    pub hour_selection: Selection,

    pub status_message: Option<String>,
    pub needs_refresh: bool,
}

impl App {
    pub fn new(config: Config, catalog: SpeciesCatalog) -> Self {
        Self {
            screen: Screen::Overview,
            should_quit: false,
            config,
            catalog,
            forecast: None,
            species_selection: Selection::default(),
            hour_selection: Selection::default(),
            status_message: None,
            needs_refresh: false,
        }
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    pub fn request_refresh(&mut self) {
        self.needs_refresh = true;
        self.set_status("Refreshing forecast...");
    }

    /// Replace the forecast, keeping selections in range and jumping to the
    /// selected species' peak hour
    pub fn update_forecast(&mut self, forecast: BiteForecast) {
        self.forecast = Some(forecast);
        self.species_selection.clamp(self.species_count());
        self.select_peak_hour();
    }

    pub fn species_count(&self) -> usize {
        self.forecast.as_ref().map(|f| f.species.len()).unwrap_or(0)
    }

    pub fn hour_count(&self) -> usize {
        self.forecast.as_ref().map(|f| f.hourly.len()).unwrap_or(0)
    }

    pub fn selected_species(&self) -> Option<&SpeciesForecast> {
        self.forecast
            .as_ref()
            .and_then(|f| f.species.get(self.species_selection.index))
    }

    pub fn selected_profile(&self) -> Option<&'static SpeciesProfile> {
        self.selected_species()
            .and_then(|s| self.catalog.get(&s.species_id))
    }

    pub fn next_species(&mut self) {
        let count = self.species_count();
        self.species_selection.next(count);
        self.select_peak_hour();
    }

    pub fn prev_species(&mut self) {
        self.species_selection.prev();
        self.select_peak_hour();
    }

    pub fn next_hour(&mut self) {
        let count = self.hour_count();
        self.hour_selection.next(count);
    }

    pub fn prev_hour(&mut self) {
        self.hour_selection.prev();
    }

    fn select_peak_hour(&mut self) {
        self.hour_selection.index = self
            .selected_species()
            .and_then(|s| s.peak())
            .map(|p| p.hour)
            .unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitecast::logic::{BiteForecastService, ForecastRequest};
    use bitecast::models::{Location, RawForecastSample};
    use chrono::{Duration, TimeZone, Utc};

    fn forecast() -> BiteForecast {
        let start = Utc.with_ymd_and_hms(2026, 1, 20, 12, 0, 0).unwrap();
        let samples = (0..9)
            .map(|i| RawForecastSample {
                temperature: Some(20.0 + i as f64),
                pressure: Some(1015.0 - i as f64),
                cloud_percent: Some(60.0),
                ..RawForecastSample::empty(start + Duration::hours(3 * i))
            })
            .collect();
        let request = ForecastRequest::new(Location::new(46.5, -94.0), start, samples)
            .with_species(vec!["walleye".into(), "burbot".into()]);
        BiteForecastService::default().run(&request).unwrap()
    }

    #[test]
    fn screen_keys() {
        assert_eq!(Screen::from_key('1'), Some(Screen::Overview));
        assert_eq!(Screen::from_key('2'), Some(Screen::Species));
        assert_eq!(Screen::from_key('x'), None);
    }

    #[test]
    fn selection_is_bounded() {
        let mut app = App::new(Config::default(), SpeciesCatalog::builtin());
        app.next_species();
        assert_eq!(app.species_selection.index, 0);

        app.update_forecast(forecast());
        app.next_species();
        app.next_species();
        assert_eq!(app.species_selection.index, 1);
        assert_eq!(app.selected_profile().unwrap().id, "burbot");

        for _ in 0..40 {
            app.next_hour();
        }
        assert_eq!(app.hour_selection.index, 23);
        app.prev_species();
        assert_eq!(app.selected_species().unwrap().species_id, "walleye");
    }

    #[test]
    fn forecast_update_selects_peak_hour() {
        let mut app = App::new(Config::default(), SpeciesCatalog::builtin());
        let forecast = forecast();
        let peak = forecast.species[0].peak().unwrap().hour;
        app.update_forecast(forecast);
        assert_eq!(app.hour_selection.index, peak);
        let selected = &app.selected_species().unwrap().scores[app.hour_selection.index];
        assert_eq!(selected.hour, peak);
    }
}
