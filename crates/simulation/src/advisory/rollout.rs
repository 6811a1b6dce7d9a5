//! Monte Carlo CVaR evaluation of committing to one action now.

use std::collections::BTreeMap;

use crate::config::CVAR_ALPHA_CEILING;
use crate::engine_view::EngineView;
use crate::scenario::{ActionKind, ZoneId};
use crate::sim_rng::{perturb_rainfall, RandomSource};

/// Sizing of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolloutParams {
    pub horizon: usize,
    pub samples: usize,
    /// Tail level; CVaR averages the worst `1 - alpha` of losses.
    pub alpha: f64,
}

/// Loss distribution of one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloutOutcome {
    pub cvar: f64,
    pub mean_loss: f64,
    /// Ascending.
    pub losses: Vec<f64>,
    /// Mean damage per zone across rollouts.
    pub zone_damage: BTreeMap<ZoneId, f64>,
}

/// Evaluate applying `action` to `zone` (or every zone when `None`) for the
/// first simulated hour only, then no further mitigation.
///
/// Each rollout copies the current storages, perturbs every hour's rainfall
/// independently and accumulates `risk × damage_scale` across zones and
/// hours. A rollout's loss is the action's nominal cost plus that damage.
pub fn evaluate_rollout(
    view: &EngineView<'_>,
    action: &ActionKind,
    zone: Option<&str>,
    params: RolloutParams,
    rng: &mut dyn RandomSource,
) -> RolloutOutcome {
    let cost = action.nominal_cost();
    if params.horizon == 0 {
        return RolloutOutcome {
            cvar: cost,
            mean_loss: cost,
            losses: vec![cost],
            zone_damage: BTreeMap::new(),
        };
    }

    let alpha = params.alpha.clamp(0.0, CVAR_ALPHA_CEILING);
    let effect = action.mitigation_effect();
    let mut losses = Vec::with_capacity(params.samples);
    let mut zone_damage_sum: BTreeMap<ZoneId, f64> =
        view.zones().map(|(id, _, _)| (id.clone(), 0.0)).collect();

    for _ in 0..params.samples {
        let mut storages: Vec<f64> = view.zones().map(|(_, _, s)| s).collect();
        let mut total_damage = 0.0;

        for h in 0..params.horizon {
            let rain = perturb_rainfall(view.config.rain_at(view.hour + h), rng);

            for ((id, zp, _), (storage, sum)) in view
                .zones()
                .zip(storages.iter_mut().zip(zone_damage_sum.values_mut()))
            {
                let targeted = zone.map_or(true, |z| z == id.as_str());
                let applied = if h == 0 && targeted { effect } else { 0.0 };

                let (next, risk) = view.advance_zone(*storage, rain, applied, zp);
                *storage = next;
                let damage = risk * zp.damage_scale;
                total_damage += damage;
                *sum += damage;
            }
        }

        losses.push(cost + total_damage);
    }

    losses.sort_by(f64::total_cmp);
    let runs = params.samples.max(1) as f64;
    let zone_damage = zone_damage_sum
        .into_iter()
        .map(|(id, sum)| (id, sum / runs))
        .collect();

    RolloutOutcome {
        cvar: tail_mean(&losses, alpha),
        mean_loss: mean(&losses),
        losses,
        zone_damage,
    }
}

/// Mean of `sorted[floor(alpha·n)..]`, or of the single worst sample when
/// that tail is empty. 0.0 for no samples.
pub fn tail_mean(sorted: &[f64], alpha: f64) -> f64 {
    let Some(&worst) = sorted.last() else {
        return 0.0;
    };
    let start = (alpha * sorted.len() as f64).floor() as usize;
    match sorted.get(start..) {
        Some(tail) if !tail.is_empty() => mean(tail),
        _ => worst,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
