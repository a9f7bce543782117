//! Taunt overlay: состояние HUD-надписи при входе в фазу 2
//!
//! Рендер остаётся за хостом. Здесь только «что показать и каким размером»:
//! size = max(10, round(32 × (1 + 0.15 × sin(4 × now)))) пока now < visible_until.

use bevy::prelude::*;

/// Event: показать taunt (пишется phase-системой при входе в фазу 2)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TauntRequested {
    pub text: String,
    pub duration_secs: f32,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TauntOverlay {
    pub text: String,
    /// Elapsed secs, до которых надпись видна
    pub visible_until: f32,
    pub base_font_size: f32,
    /// Частота пульсации (рад/сек)
    pub pulse_speed: f32,
    /// Амплитуда пульсации (доля base_font_size)
    pub pulse_scale: f32,
    pub min_font_size: u32,
}

impl Default for TauntOverlay {
    fn default() -> Self {
        Self {
            text: String::new(),
            visible_until: 0.0,
            base_font_size: 32.0,
            pulse_speed: 4.0,
            pulse_scale: 0.15,
            min_font_size: 10,
        }
    }
}

impl TauntOverlay {
    pub fn show(&mut self, text: impl Into<String>, now: f32, duration_secs: f32) {
        self.text = text.into();
        self.visible_until = now + duration_secs;
    }

    pub fn is_visible(&self, now: f32) -> bool {
        !self.text.is_empty() && now < self.visible_until
    }

    /// Размер шрифта в момент `now`; None если надпись скрыта
    pub fn font_size(&self, now: f32) -> Option<u32> {
        if !self.is_visible(now) {
            return None;
        }

        let pulse = 1.0 + self.pulse_scale * (self.pulse_speed * now).sin();
        let size = (self.base_font_size * pulse).round().max(0.0) as u32;
        Some(size.max(self.min_font_size))
    }
}

/// System: TauntRequested → TauntOverlay
pub fn apply_taunt_requests(
    time: Res<Time>,
    mut requests: EventReader<TauntRequested>,
    mut overlay: ResMut<TauntOverlay>,
) {
    for request in requests.read() {
        overlay.show(request.text.clone(), time.elapsed_secs(), request.duration_secs);
        crate::logger::log_info(&format!(
            "Taunt shown: \"{}\" until t={:.2}",
            overlay.text, overlay.visible_until
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_until_shown() {
        let overlay = TauntOverlay::default();
        assert!(!overlay.is_visible(0.0));
        assert_eq!(overlay.font_size(0.0), None);
    }

    #[test]
    fn test_visible_for_duration() {
        let mut overlay = TauntOverlay::default();
        overlay.show("You will pay for that", 10.0, 3.0);

        assert!(overlay.is_visible(10.0));
        assert!(overlay.is_visible(12.9));
        assert!(!overlay.is_visible(13.0));
        assert_eq!(overlay.font_size(13.5), None);
    }

    #[test]
    fn test_font_size_pulses_around_base() {
        let mut overlay = TauntOverlay::default();
        overlay.show("taunt", 0.0, 100.0);

        // sin(0) = 0
        assert_eq!(overlay.font_size(0.0), Some(32));

        // sin(4t) = 1 при t = π/8: 32 × 1.15 = 36.8
        let peak = std::f32::consts::PI / 8.0;
        assert_eq!(overlay.font_size(peak), Some(37));

        // sin(4t) = -1: 32 × 0.85 = 27.2
        let trough = 3.0 * std::f32::consts::PI / 8.0;
        assert_eq!(overlay.font_size(trough), Some(27));
    }

    #[test]
    fn test_font_size_never_below_minimum() {
        let mut overlay = TauntOverlay {
            base_font_size: 8.0,
            ..Default::default()
        };
        overlay.show("taunt", 0.0, 10.0);

        for step in 0..40 {
            let size = overlay.font_size(step as f32 * 0.2).expect("visible");
            assert!(size >= 10);
        }
    }
}
