// Copyright (c) 2026 xmpp-pubsub-service contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Decoders lifting request payloads into typed records.
//!
//! Every decoder receives the requestor (already reduced to bare form) and
//! the command child of the `<pubsub/>` payload.  A missing or malformed
//! required attribute is a `BadRequest`; the backend is never consulted
//! for such stanzas.

use std::collections::BTreeMap;

use jid::{BareJid, Jid};
use minidom::Element;
use xmpp_parsers::data_forms::DataForm;
use xmpp_parsers::pubsub::{ItemId, NodeName};

use crate::error::PubSubError;
use crate::ns;

#[derive(Debug)]
pub(crate) struct Publish {
    pub requestor: BareJid,
    pub node: NodeName,
    pub items: Vec<Element>,
}

#[derive(Debug)]
pub(crate) struct Subscribe {
    pub requestor: BareJid,
    pub node: NodeName,
    pub subscriber: Jid,
}

pub(crate) struct Unsubscribe {
    pub requestor: BareJid,
    pub node: NodeName,
    pub subscriber: Jid,
}

pub(crate) struct Create {
    pub requestor: BareJid,
    pub node: Option<NodeName>,
}

#[derive(Debug)]
pub(crate) struct Items {
    pub requestor: BareJid,
    pub node: NodeName,
    pub max_items: Option<u32>,
    pub item_ids: Vec<ItemId>,
}

pub(crate) struct Retract {
    pub requestor: BareJid,
    pub node: NodeName,
    pub item_ids: Vec<ItemId>,
}

pub(crate) struct ConfigureGet {
    pub requestor: BareJid,
    pub node: Option<NodeName>,
}

/// Purge and delete carry nothing but the node.
pub(crate) struct NodeRequest {
    pub requestor: BareJid,
    pub node: NodeName,
}

#[derive(Debug)]
pub(crate) struct ConfigureSet {
    pub requestor: BareJid,
    pub node: NodeName,
    /// `None` when the owner cancelled the configuration exchange.
    pub options: Option<BTreeMap<String, String>>,
}

pub(crate) fn publish(requestor: BareJid, elem: &Element) -> Result<Publish, PubSubError> {
    Ok(Publish {
        requestor,
        node: required_node(elem)?,
        items: elem
            .children()
            .filter(|child| child.is("item", ns::PUBSUB))
            .cloned()
            .collect(),
    })
}

pub(crate) fn subscribe(requestor: BareJid, elem: &Element) -> Result<Subscribe, PubSubError> {
    Ok(Subscribe {
        requestor,
        node: required_node(elem)?,
        subscriber: required_jid(elem, "jid")?,
    })
}

pub(crate) fn unsubscribe(requestor: BareJid, elem: &Element) -> Result<Unsubscribe, PubSubError> {
    Ok(Unsubscribe {
        requestor,
        node: required_node(elem)?,
        subscriber: required_jid(elem, "jid")?,
    })
}

pub(crate) fn create(requestor: BareJid, elem: &Element) -> Result<Create, PubSubError> {
    Ok(Create {
        requestor,
        node: elem.attr("node").map(|node| NodeName(node.to_owned())),
    })
}

pub(crate) fn items(requestor: BareJid, elem: &Element) -> Result<Items, PubSubError> {
    let max_items = match elem.attr("max_items") {
        None => None,
        Some(value) => {
            let count: u32 = value.parse().map_err(|_| PubSubError::BadRequest)?;
            if count == 0 {
                return Err(PubSubError::BadRequest);
            }
            Some(count)
        }
    };
    Ok(Items {
        requestor,
        node: required_node(elem)?,
        max_items,
        item_ids: item_ids(elem)?,
    })
}

pub(crate) fn retract(requestor: BareJid, elem: &Element) -> Result<Retract, PubSubError> {
    Ok(Retract {
        requestor,
        node: required_node(elem)?,
        item_ids: item_ids(elem)?,
    })
}

pub(crate) fn node_only(requestor: BareJid, elem: &Element) -> Result<NodeRequest, PubSubError> {
    Ok(NodeRequest {
        requestor,
        node: required_node(elem)?,
    })
}

pub(crate) fn configure_get(
    requestor: BareJid,
    elem: &Element,
) -> Result<ConfigureGet, PubSubError> {
    Ok(ConfigureGet {
        requestor,
        node: elem.attr("node").map(|node| NodeName(node.to_owned())),
    })
}

/// Search all data forms below `<configure/>` for the one to act on.
///
/// A `cancel` form ends the exchange with nothing to apply.  Forms that
/// are not of type `submit`, or whose FORM_TYPE is not the node
/// configuration namespace, are skipped rather than rejected.  When no
/// form qualifies the request is malformed.
pub(crate) fn configure_set(
    requestor: BareJid,
    elem: &Element,
) -> Result<ConfigureSet, PubSubError> {
    let node = required_node(elem)?;

    for form_elem in elem.children().filter(|child| child.is("x", ns::DATA_FORMS)) {
        match form_elem.attr("type") {
            Some("cancel") => {
                return Ok(ConfigureSet {
                    requestor,
                    node,
                    options: None,
                })
            }
            Some("submit") => (),
            _ => continue,
        }

        let form =
            DataForm::try_from(form_elem.clone()).map_err(|_| PubSubError::BadRequest)?;
        if form.form_type.as_deref() != Some(ns::PUBSUB_CONFIGURE) {
            continue;
        }

        return Ok(ConfigureSet {
            requestor,
            node,
            options: Some(form_options(form)?),
        });
    }

    Err(PubSubError::BadRequest)
}

/// Flatten a submitted form into a field/value mapping.
///
/// `DataForm` parsing has already hoisted FORM_TYPE out of the field
/// list, so the mapping reaches the backend without it.  Submitted
/// fields carry exactly one value of interest; a field without a `var`
/// or without any value is malformed.
fn form_options(form: DataForm) -> Result<BTreeMap<String, String>, PubSubError> {
    let mut options = BTreeMap::new();
    for field in form.fields {
        let var = field.var.ok_or(PubSubError::BadRequest)?;
        let value = field
            .values
            .into_iter()
            .next()
            .ok_or(PubSubError::BadRequest)?;
        options.insert(var, value);
    }
    Ok(options)
}

fn required_attr(elem: &Element, name: &str) -> Result<String, PubSubError> {
    elem.attr(name)
        .map(String::from)
        .ok_or(PubSubError::BadRequest)
}

fn required_node(elem: &Element) -> Result<NodeName, PubSubError> {
    required_attr(elem, "node").map(NodeName)
}

fn required_jid(elem: &Element, name: &str) -> Result<Jid, PubSubError> {
    required_attr(elem, name)?
        .parse()
        .map_err(|_| PubSubError::BadRequest)
}

fn item_ids(elem: &Element) -> Result<Vec<ItemId>, PubSubError> {
    elem.children()
        .filter(|child| child.is("item", ns::PUBSUB))
        .map(|item| required_attr(item, "id").map(ItemId))
        .collect()
}
