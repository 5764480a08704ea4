// Copyright (c) 2026 xmpp-pubsub-service contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Encoders turning backend results into response payloads, and the
//! builders assembling the outgoing IQ stanzas themselves.

use jid::Jid;
use minidom::Element;
use xmpp_parsers::data_forms::{DataForm, DataFormType, Field};
use xmpp_parsers::pubsub::{AffiliationAttribute, NodeName, Subscription};
use xmpp_parsers::stanza_error::StanzaError;

use crate::backend::SubscriptionInfo;
use crate::ns;

pub(crate) fn subscription(node: &NodeName, subscriber: &Jid, state: Subscription) -> Element {
    Element::builder("pubsub", ns::PUBSUB)
        .append(
            Element::builder("subscription", ns::PUBSUB)
                .attr("node", node.0.as_str())
                .attr("jid", subscriber.clone())
                .attr("subscription", state),
        )
        .build()
}

pub(crate) fn subscriptions(entries: Vec<SubscriptionInfo>) -> Element {
    Element::builder("pubsub", ns::PUBSUB)
        .append(
            Element::builder("subscriptions", ns::PUBSUB).append_all(entries.into_iter().map(
                |entry| {
                    Element::builder("subscription", ns::PUBSUB)
                        .attr("node", entry.node.0)
                        .attr("jid", entry.subscriber)
                        .attr("subscription", entry.state)
                },
            )),
        )
        .build()
}

pub(crate) fn affiliations(entries: Vec<(NodeName, AffiliationAttribute)>) -> Element {
    Element::builder("pubsub", ns::PUBSUB)
        .append(
            Element::builder("affiliations", ns::PUBSUB).append_all(entries.into_iter().map(
                |(node, affiliation)| {
                    Element::builder("affiliation", ns::PUBSUB)
                        .attr("node", node.0)
                        .attr("affiliation", affiliation)
                },
            )),
        )
        .build()
}

pub(crate) fn create(node: &NodeName) -> Element {
    Element::builder("pubsub", ns::PUBSUB)
        .append(Element::builder("create", ns::PUBSUB).attr("node", node.0.as_str()))
        .build()
}

pub(crate) fn items(node: &NodeName, items: Vec<Element>) -> Element {
    Element::builder("pubsub", ns::PUBSUB)
        .append(
            Element::builder("items", ns::PUBSUB)
                .attr("node", node.0.as_str())
                .append_all(items),
        )
        .build()
}

pub(crate) fn default_configuration(fields: Vec<Field>) -> Element {
    Element::builder("pubsub", ns::PUBSUB_OWNER)
        .append(Element::builder("default", ns::PUBSUB_OWNER).append(configuration_form(fields)))
        .build()
}

pub(crate) fn configuration(node: Option<&NodeName>, fields: Vec<Field>) -> Element {
    Element::builder("pubsub", ns::PUBSUB_OWNER)
        .append(
            Element::builder("configure", ns::PUBSUB_OWNER)
                .attr("node", node.map(|node| node.0.as_str()))
                .append(configuration_form(fields)),
        )
        .build()
}

fn configuration_form(fields: Vec<Field>) -> Element {
    Element::from(DataForm::new(
        DataFormType::Form,
        ns::PUBSUB_CONFIGURE,
        fields,
    ))
}

/// Wrap a successful outcome in an `<iq type='result'/>`, echoing the
/// request id and swapping the addresses.
pub(crate) fn result_iq(request: &Element, payload: Option<Element>) -> Element {
    let builder = Element::builder("iq", request.ns())
        .attr("type", "result")
        .attr("id", request.attr("id"))
        .attr("to", request.attr("from"))
        .attr("from", request.attr("to"));
    match payload {
        Some(payload) => builder.append(payload).build(),
        None => builder.build(),
    }
}

/// Wrap a failure in an `<iq type='error'/>`.  The request payload is
/// echoed back before the `<error/>` element, per XMPP convention.
pub(crate) fn error_iq(request: &Element, error: StanzaError) -> Element {
    Element::builder("iq", request.ns())
        .attr("type", "error")
        .attr("id", request.attr("id"))
        .attr("to", request.attr("from"))
        .attr("from", request.attr("to"))
        .append_all(request.children().cloned())
        .append(error)
        .build()
}
