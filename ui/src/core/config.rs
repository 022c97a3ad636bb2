//! Chart layout settings.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Outer size of the chart surface and the sizes of its marks. The right
/// margin leaves room for the legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub point_radius: f64,
    pub hover_radius: f64,
    pub stroke_width: f64,
    pub legend_row: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 500.0,
            margin: Margin {
                top: 20.0,
                right: 200.0,
                bottom: 60.0,
                left: 80.0,
            },
            point_radius: 3.0,
            hover_radius: 5.0,
            stroke_width: 2.0,
            legend_row: 18.0,
        }
    }
}

impl ChartConfig {
    pub fn plot_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_area_excludes_margins() {
        let config = ChartConfig::default();
        assert_eq!(config.plot_width(), 920.0);
        assert_eq!(config.plot_height(), 420.0);
    }

    #[test]
    fn undersized_surface_clamps_to_zero() {
        let config = ChartConfig {
            width: 100.0,
            height: 50.0,
            ..ChartConfig::default()
        };
        assert_eq!(config.plot_width(), 0.0);
        assert_eq!(config.plot_height(), 0.0);
    }
}
