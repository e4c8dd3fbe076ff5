//! Sprint load card and the detailed sprint load panel.

use crate::config::SprintConfig;
use crate::data::{CurrentSprintStats, SprintWorkloadStats};
use crate::workload::{recommendations, Recommendation, WorkloadBand};

/// Summary card in the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct SprintLoadCard {
    pub percent: String,
    pub sprint_name: String,
    pub icon: &'static str,
    /// Left border colour
    pub color: &'static str,
    pub band: Option<WorkloadBand>,
}

impl SprintLoadCard {
    pub fn unavailable() -> Self {
        Self {
            percent: "N/A".to_string(),
            sprint_name: "Нет данных".to_string(),
            icon: WorkloadBand::Light.icon(),
            color: WorkloadBand::Light.color(),
            band: None,
        }
    }

    pub fn from_stats(stats: &CurrentSprintStats, cfg: &SprintConfig) -> Self {
        match stats {
            CurrentSprintStats::Unavailable { .. } => Self::unavailable(),
            CurrentSprintStats::Available(s) => {
                let band = WorkloadBand::for_stats(s, cfg);
                Self {
                    percent: format!("{}%", s.workload_percent),
                    sprint_name: s.sprint_name.clone(),
                    icon: band.icon(),
                    color: band.color(),
                    band: Some(band),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressLevel {
    Normal,
    Warning,
    Danger,
}

/// A progress bar clamped to 0..=100 with the raw label.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub fill: f64,
    pub label: String,
    pub level: ProgressLevel,
}

impl Progress {
    fn new(percent: f64, level: ProgressLevel) -> Self {
        Self {
            fill: percent.clamp(0.0, 100.0),
            label: format!("{}%", percent),
            level,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub title: &'static str,
    pub value: String,
    pub subtext: String,
    pub progress: Option<Progress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityNote {
    Exceeded,
    WithinCapacity,
}

impl CapacityNote {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Exceeded => "⚠️ Работы больше чем capacity!",
            Self::WithinCapacity => "✓ В пределах capacity",
        }
    }
}

/// Detailed sprint load panel for the Sprint load tab.
#[derive(Debug, Clone, PartialEq)]
pub struct SprintLoadDetails {
    pub title: String,
    pub sprint_name: String,
    pub band: WorkloadBand,
    pub metrics: Vec<Metric>,
    pub capacity_note: CapacityNote,
    pub recommendations: Vec<Recommendation>,
}

fn workload_level(percent: f64, cfg: &SprintConfig) -> ProgressLevel {
    if percent > cfg.overloaded_above {
        ProgressLevel::Danger
    } else if percent > cfg.full_above {
        ProgressLevel::Warning
    } else {
        ProgressLevel::Normal
    }
}

impl SprintLoadDetails {
    pub fn build(s: &SprintWorkloadStats, cfg: &SprintConfig) -> Self {
        let capacity_note = if s.remaining_work > s.remaining_capacity {
            CapacityNote::Exceeded
        } else {
            CapacityNote::WithinCapacity
        };

        let metrics = vec![
            Metric {
                title: "📊 Capacity спринта",
                value: format!("{}ч", s.sprint_capacity),
                subtext: "2 недели работы".to_string(),
                progress: None,
            },
            Metric {
                title: "📝 Оценка задач",
                value: format!("{}ч", s.total_estimated),
                subtext: format!("{}% от capacity", s.workload_percent),
                progress: Some(Progress::new(
                    s.workload_percent,
                    workload_level(s.workload_percent, cfg),
                )),
            },
            Metric {
                title: "⏱️ Затрачено времени",
                value: format!("{}ч", s.total_spent),
                subtext: format!("{}% от capacity", s.time_used_percent),
                progress: Some(Progress::new(s.time_used_percent, ProgressLevel::Normal)),
            },
            Metric {
                title: "✅ Прогресс задач",
                value: format!("{}/{}", s.completed_tasks, s.total_tasks),
                subtext: format!("{}% завершено", s.progress_percent),
                progress: Some(Progress::new(s.progress_percent, ProgressLevel::Normal)),
            },
            Metric {
                title: "🔄 Активные задачи",
                value: s.in_progress_tasks.to_string(),
                subtext: "В работе сейчас".to_string(),
                progress: None,
            },
            Metric {
                title: "📋 Открытые задачи",
                value: s.open_tasks.to_string(),
                subtext: "Ожидают начала".to_string(),
                progress: None,
            },
            Metric {
                title: "⚡ Оставшаяся capacity",
                value: format!("{}ч", s.remaining_capacity),
                subtext: format!("Осталось работы: {}ч", s.remaining_work),
                progress: None,
            },
        ];

        Self {
            title: format!("⚡ Загруженность: {}", s.sprint_name),
            sprint_name: s.sprint_name.clone(),
            band: WorkloadBand::for_stats(s, cfg),
            metrics,
            capacity_note,
            recommendations: recommendations(s, cfg),
        }
    }
}
