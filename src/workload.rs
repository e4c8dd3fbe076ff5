//! Sprint workload bands and recommendations.

use crate::config::SprintConfig;
use crate::data::SprintWorkloadStats;

/// Load band of the current sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadBand {
    Light,
    Normal,
    Full,
    Overloaded,
}

impl WorkloadBand {
    /// Band from the workload percentage using the configured thresholds.
    pub fn classify(workload_percent: f64, cfg: &SprintConfig) -> Self {
        if workload_percent > cfg.overloaded_above {
            Self::Overloaded
        } else if workload_percent > cfg.full_above {
            Self::Full
        } else if workload_percent < cfg.light_below {
            Self::Light
        } else {
            Self::Normal
        }
    }

    /// Band named by the backend's `workload_status` string.
    pub fn from_backend(status: &str) -> Option<Self> {
        match status {
            "light" => Some(Self::Light),
            "normal" => Some(Self::Normal),
            "full" => Some(Self::Full),
            "overloaded" => Some(Self::Overloaded),
            _ => None,
        }
    }

    /// The backend's status wins when it names a known band.
    pub fn for_stats(stats: &SprintWorkloadStats, cfg: &SprintConfig) -> Self {
        Self::from_backend(&stats.workload_status)
            .unwrap_or_else(|| Self::classify(stats.workload_percent, cfg))
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Overloaded => "🔴",
            Self::Full => "🟡",
            Self::Normal => "🟢",
            Self::Light => "⚪",
        }
    }

    /// Border colour of the summary card.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Overloaded => "#e74c3c",
            Self::Full => "#f39c12",
            Self::Normal => "#27ae60",
            Self::Light => "#95a5a6",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Light => "Лёгкая загрузка",
            Self::Normal => "Нормальная загрузка",
            Self::Full => "Полная загрузка",
            Self::Overloaded => "Перегружен",
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Self::Light => "status-light",
            Self::Normal => "status-normal",
            Self::Full => "status-full",
            Self::Overloaded => "status-overloaded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationKind {
    Overloaded,
    HighLoad,
    LowLoad,
    Optimal,
    CompletionRisk,
    QueueBacklog,
    GoodPace,
}

/// One advisory line: an emphasized title followed by the explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub icon: &'static str,
    pub title: &'static str,
    pub text: String,
}

impl Recommendation {
    fn new(kind: RecommendationKind, icon: &'static str, title: &'static str, text: String) -> Self {
        Self {
            kind,
            icon,
            title,
            text,
        }
    }
}

/// Rendered when no rule fires.
pub const ALL_ON_TRACK: &str = "Всё идёт по плану! 🎯";

/// Evaluate the recommendation rules in order.
///
/// Exactly one load-level rule fires, then the risk, queue and pace rules
/// are checked independently.
pub fn recommendations(stats: &SprintWorkloadStats, cfg: &SprintConfig) -> Vec<Recommendation> {
    use RecommendationKind::*;

    let mut out = Vec::new();
    let percent = stats.workload_percent;

    if percent > cfg.overloaded_above {
        out.push(Recommendation::new(
            Overloaded,
            "🔴",
            "Спринт перегружен!",
            format!(
                "Оценка задач превышает capacity на {:.1}%. Рекомендуется перенести часть задач.",
                percent - 100.0
            ),
        ));
    } else if percent > cfg.full_above {
        out.push(Recommendation::new(
            HighLoad,
            "🟡",
            "Высокая загрузка.",
            "Спринт загружен почти полностью. Будьте осторожны с добавлением новых задач."
                .to_string(),
        ));
    } else if percent < cfg.light_below {
        out.push(Recommendation::new(
            LowLoad,
            "⚪",
            "Низкая загрузка.",
            format!(
                "В спринте есть место для дополнительных задач (~{:.1}ч).",
                cfg.capacity_hours - stats.total_estimated
            ),
        ));
    } else {
        out.push(Recommendation::new(
            Optimal,
            "🟢",
            "Оптимальная загрузка.",
            "Спринт загружен хорошо.".to_string(),
        ));
    }

    if stats.remaining_work > stats.remaining_capacity
        && stats.progress_percent < cfg.risk_progress_below
    {
        out.push(Recommendation::new(
            CompletionRisk,
            "⚠️",
            "Риск не завершить спринт.",
            "Оставшейся работы больше чем свободного времени.".to_string(),
        ));
    }

    if stats.open_tasks as f64 > stats.in_progress_tasks as f64 * cfg.queue_ratio {
        out.push(Recommendation::new(
            QueueBacklog,
            "📋",
            "Много задач в очереди.",
            "Рекомендуется начать работу над открытыми задачами.".to_string(),
        ));
    }

    if stats.progress_percent > cfg.pace_progress_above
        && stats.time_used_percent < cfg.pace_time_used_below
    {
        out.push(Recommendation::new(
            GoodPace,
            "✅",
            "Отличный темп!",
            "Команда завершает задачи эффективно.".to_string(),
        ));
    }

    out
}
