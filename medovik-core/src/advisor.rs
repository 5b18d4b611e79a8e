use crate::analyzer::RecipeAnalysis;
use crate::constants::{IdealRange, ideal_range};
use crate::recipe::{CheckStatus, Component};
use serde::Serialize;

/// Fixed advice text for one (component, status) pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Advice {
    pub impact: &'static str,
    pub solution: &'static str,
    pub science: &'static str,
}

/// Improvement card for a component outside its ideal band.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdviceCard {
    pub component: Component,
    pub component_name: &'static str,
    pub status: CheckStatus,
    /// Percent of total dough mass.
    pub current_value: f64,
    pub ideal_range: IdealRange,
    pub impact: &'static str,
    pub solution: &'static str,
    pub science: &'static str,
}

/// Advice for a component in a given state. `None` for optimal components.
pub fn advice_for(component: Component, status: CheckStatus) -> Option<Advice> {
    use CheckStatus::{High, Low, Optimal};
    use Component::{Butter, Eggs, Flour, Soda, Sugars};

    let advice = match (component, status) {
        (_, Optimal) => return None,
        (Flour, Low) => Advice {
            impact: "Dough is slack and sticky; layers spread and tear when lifted",
            solution: "Increase flour in 25 g steps, or reduce eggs and honey slightly",
            science: "Gluten and starch are the structural network; too little cannot bind the liquid and sugars",
        },
        (Flour, High) => Advice {
            impact: "Dry, tough layers that stay hard even after soaking",
            solution: "Reduce flour by 5-10% or add one egg yolk",
            science: "Excess starch competes for the limited water, leaving little for gelatinization and tenderness",
        },
        (Butter, Low) => Advice {
            impact: "Layers taste lean and turn crisp-dry instead of tender",
            solution: "Add butter up to 12% of the dough mass",
            science: "Fat coats gluten strands and shortens them, which is what keeps thin layers tender",
        },
        (Butter, High) => Advice {
            impact: "Greasy dough that is hard to roll and bakes brittle",
            solution: "Cut butter back toward 12% and chill the dough before rolling",
            science: "Excess fat breaks the gluten network entirely and melts out during baking",
        },
        (Sugars, Low) => Advice {
            impact: "Pale layers with weak honey flavour and little caramel note",
            solution: "Increase honey first, then sugar, until sugars reach about 30%",
            science: "Reducing sugars feed Maillard browning and caramelization that define the honey-cake taste",
        },
        (Sugars, High) => Advice {
            impact: "Layers darken fast, taste cloying and become brittle when cool",
            solution: "Reduce sugar (keep the honey) by 10-15%",
            science: "High sugar raises browning speed and sets into a glassy, brittle matrix on cooling",
        },
        (Eggs, Low) => Advice {
            impact: "Dough cracks and layers crumble",
            solution: "Add one egg (about 50 g) per 500 g flour",
            science: "Egg proteins coagulate into a binding network and supply most of the dough's water",
        },
        (Eggs, High) => Advice {
            impact: "Rubbery, spongy layers with an eggy smell",
            solution: "Replace one egg with 30 g of honey or reduce eggs by 10%",
            science: "Excess coagulated protein tightens the crumb and traps steam",
        },
        (Soda, Low) => Advice {
            impact: "Dense layers and a pale, flat colour",
            solution: "Use about 1 teaspoon (5 g) of soda per 500 g flour",
            science: "Soda neutralizes honey acids to release CO2 and raises pH, which speeds browning",
        },
        (Soda, High) => Advice {
            impact: "Soapy, metallic aftertaste and overly dark layers",
            solution: "Reduce soda to 1% of flour and make sure it fully reacts with the honey",
            science: "Unreacted sodium carbonate stays alkaline, tastes soapy and over-accelerates browning",
        },
    };
    Some(advice)
}

/// One card per component outside its band, in component order.
pub fn generate_advice(analysis: &RecipeAnalysis) -> Vec<AdviceCard> {
    analysis
        .checks
        .iter()
        .filter_map(|(&component, &status)| {
            let advice = advice_for(component, status)?;
            Some(AdviceCard {
                component,
                component_name: component.label(),
                status,
                current_value: analysis.percentages.of_component(component),
                ideal_range: ideal_range(component),
                impact: advice.impact,
                solution: advice.solution,
                science: advice.science,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_recipe;
    use crate::recipe::DoughRecipe;

    #[test]
    fn test_optimal_recipe_has_no_advice() {
        let a = analyze_recipe(&DoughRecipe::ideal()).unwrap().unwrap();
        assert!(generate_advice(&a).is_empty());
    }

    #[test]
    fn test_every_off_band_pair_has_advice() {
        for c in Component::ALL {
            assert!(advice_for(c, CheckStatus::Low).is_some());
            assert!(advice_for(c, CheckStatus::High).is_some());
            assert!(advice_for(c, CheckStatus::Optimal).is_none());
        }
    }

    #[test]
    fn test_cards_follow_component_order() {
        let a = analyze_recipe(&DoughRecipe {
            butter: 400.0,
            ..DoughRecipe::ideal()
        })
        .unwrap()
        .unwrap();
        let cards = generate_advice(&a);
        let order: Vec<Component> = cards.iter().map(|c| c.component).collect();
        assert_eq!(
            order,
            vec![
                Component::Flour,
                Component::Butter,
                Component::Sugars,
                Component::Eggs
            ]
        );
        assert_eq!(cards[1].status, CheckStatus::High);
        assert!(cards[1].current_value > cards[1].ideal_range.max);
    }
}
