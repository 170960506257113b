//! Billing screen
//!
//! Plans, the current subscription, usage, and payment history. Checkout
//! hands off to the hosted payment page; "I've paid" reports completion
//! back so the worker can run the settle schedule while the webhook lands.

use eframe::egui;

use crate::api::types::{BillingCycle, SubscriptionStatus};
use crate::app::state::AppState;
use crate::app::theme::{colors, styles};

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label(
        egui::RichText::new("Billing")
            .size(22.0)
            .strong()
            .color(colors::TEXT_PRIMARY),
    );
    ui.add_space(12.0);

    egui::ScrollArea::vertical().show(ui, |ui| {
        render_current_subscription(ui, state);
        ui.add_space(12.0);
        render_checkout_banner(ui, state);
        render_plans(ui, state);
        ui.add_space(12.0);
        render_payments(ui, state);
    });
}

fn render_current_subscription(ui: &mut egui::Ui, state: &mut AppState) {
    styles::card_frame().show(ui, |ui| {
        ui.label(
            egui::RichText::new("Current subscription")
                .size(16.0)
                .strong()
                .color(colors::TEXT_PRIMARY),
        );
        ui.add_space(6.0);

        let Some(subscription) = state.subscription.clone() else {
            if state.subscription_missing {
                ui.colored_label(
                    colors::TEXT_SECONDARY,
                    "You're on the free tier. Pick a plan below to upgrade.",
                );
            } else {
                ui.spinner();
            }
            return;
        };

        ui.horizontal(|ui| {
            ui.colored_label(
                colors::TEXT_PRIMARY,
                egui::RichText::new(&subscription.plan_name).strong(),
            );
            let (color, label) = match subscription.status {
                SubscriptionStatus::Active => (colors::SUCCESS, "active"),
                SubscriptionStatus::Trial => (colors::WARNING, "trial"),
                SubscriptionStatus::Cancelled => (colors::STATUS_NEUTRAL, "cancelled"),
                SubscriptionStatus::Expired => (colors::ERROR, "expired"),
            };
            styles::status_badge(ui, color, label);
        });
        ui.colored_label(
            colors::TEXT_SECONDARY,
            format!(
                "{} of {} meetings · period ends {}",
                subscription.meetings_used,
                subscription.meetings_limit,
                subscription.current_period_end.format("%Y-%m-%d")
            ),
        );
        ui.add_space(8.0);

        if subscription.cancel_at_period_end {
            ui.colored_label(
                colors::WARNING,
                "Cancels at the end of the current period.",
            );
            if ui.button("Resume subscription").clicked() {
                state.handle_resume_subscription();
            }
        } else if subscription.status == SubscriptionStatus::Active {
            if ui.button("Cancel at period end").clicked() {
                state.handle_cancel_subscription();
            }
        }
        if ui.button("Manage payment methods").clicked() {
            state.handle_open_portal();
        }
        if let Some(portal_url) = state.portal_url.clone() {
            ui.hyperlink_to("Open billing portal", portal_url);
        }
    });
}

fn render_checkout_banner(ui: &mut egui::Ui, state: &mut AppState) {
    let Some(order) = state.checkout.clone() else {
        return;
    };
    styles::card_frame().show(ui, |ui| {
        ui.colored_label(
            colors::TEXT_PRIMARY,
            egui::RichText::new("Complete your payment").strong(),
        );
        ui.hyperlink_to("Open secure checkout", &order.checkout_url);
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let done = egui::Button::new(
                egui::RichText::new("I've paid").color(egui::Color32::WHITE),
            )
            .fill(colors::SUCCESS);
            if ui.add(done).clicked() {
                state.handle_checkout_completed();
            }
            if ui.button("Dismiss").clicked() {
                state.checkout = None;
            }
        });
    });
    ui.add_space(12.0);
}

fn render_plans(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("Plans")
                .size(16.0)
                .strong()
                .color(colors::TEXT_PRIMARY),
        );
        ui.add_space(12.0);
        for cycle in [BillingCycle::Monthly, BillingCycle::Yearly] {
            let selected = state.billing_cycle == cycle;
            let label = match cycle {
                BillingCycle::Monthly => "monthly",
                BillingCycle::Yearly => "yearly",
            };
            if ui.selectable_label(selected, label).clicked() {
                state.billing_cycle = cycle;
            }
        }
    });
    ui.add_space(6.0);

    if state.plans.is_empty() {
        styles::card_frame().show(ui, |ui| {
            ui.colored_label(colors::TEXT_SECONDARY, "No plans available.");
        });
        return;
    }

    let plans = state.plans.clone();
    let current_plan = state
        .subscription
        .as_ref()
        .map(|subscription| subscription.plan_id.clone());
    ui.columns(plans.len().min(3), |columns| {
        for (column, plan) in columns.iter_mut().zip(&plans) {
            styles::card_frame().show(column, |ui| {
                ui.label(
                    egui::RichText::new(&plan.name)
                        .size(16.0)
                        .strong()
                        .color(colors::TEXT_PRIMARY),
                );
                ui.label(
                    egui::RichText::new(format!("{:.2} {}", plan.price, plan.currency))
                        .size(22.0)
                        .color(colors::TEXT_PRIMARY),
                );
                ui.colored_label(
                    colors::TEXT_SECONDARY,
                    format!("{} meetings / period", plan.meetings_limit),
                );
                if let Some(limit) = plan.duration_limit {
                    ui.colored_label(colors::TEXT_SECONDARY, format!("up to {limit} min each"));
                }
                for feature in &plan.features {
                    ui.colored_label(colors::TEXT_SECONDARY, format!("✓ {feature}"));
                }
                ui.add_space(8.0);
                if current_plan.as_deref() == Some(plan.id.as_str()) {
                    ui.colored_label(colors::SUCCESS, "Current plan");
                } else {
                    let choose = egui::Button::new(
                        egui::RichText::new("Choose").color(egui::Color32::WHITE),
                    )
                    .fill(colors::ACCENT);
                    if ui.add_enabled(!state.pending, choose).clicked() {
                        state.handle_create_checkout(plan.id.clone());
                    }
                }
            });
        }
    });
}

fn render_payments(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label(
        egui::RichText::new("Payment history")
            .size(16.0)
            .strong()
            .color(colors::TEXT_PRIMARY),
    );
    ui.add_space(6.0);
    if state.payments.is_empty() {
        styles::card_frame().show(ui, |ui| {
            ui.colored_label(colors::TEXT_SECONDARY, "No payments yet.");
        });
        return;
    }
    for payment in state.payments.clone() {
        styles::card_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                styles::status_badge(
                    ui,
                    colors::payment_status_color(payment.status),
                    &format!("{:?}", payment.status).to_lowercase(),
                );
                ui.colored_label(
                    colors::TEXT_PRIMARY,
                    format!("{:.2} {}", payment.amount, payment.currency),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(invoice_url) = &payment.invoice_url {
                        ui.hyperlink_to("invoice", invoice_url);
                    }
                    ui.colored_label(
                        colors::TEXT_SECONDARY,
                        payment.created_at.format("%Y-%m-%d").to_string(),
                    );
                });
            });
        });
        ui.add_space(4.0);
    }
}
