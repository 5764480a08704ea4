// Copyright (c) 2026 xmpp-pubsub-service contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use futures::{Sink, SinkExt};
use jid::{BareJid, Jid};
use minidom::Element;
use xmpp_parsers::disco::Identity;
use xmpp_parsers::pubsub::NodeName;

use crate::backend::PubSubBackend;
use crate::command::{Command, IqKind};
use crate::error::PubSubError;
use crate::feature::PubSubFeature;
use crate::ns;
use crate::{request, response};

/// A publish-subscribe service dispatcher.
///
/// The service sits between a component's XML stream and a
/// [`PubSubBackend`] owning all node state.  Feed it every inbound IQ via
/// [`PubSubService::handle_iq`]; stanzas matching the XEP-0060 request
/// grammar are decoded, dispatched to the backend, and answered on the
/// outbound stream with an IQ result or error.  Everything else is left
/// untouched for other handlers.
///
/// After construction the service holds only immutable configuration and
/// performs no blocking work of its own; all waiting happens inside the
/// backend's futures.
pub struct PubSubService<B, S> {
    pub(crate) backend: B,
    stream: S,
    pub(crate) identity: Identity,
    pub(crate) features: Vec<PubSubFeature>,
    pub(crate) hide_nodes: bool,
}

/// Builder for [`PubSubService`].
///
/// ```
/// use futures::channel::mpsc;
/// use xmpp_pubsub_service::minidom::Element;
/// use xmpp_pubsub_service::{PubSubBackend, PubSubFeature, PubSubServiceBuilder};
///
/// struct Store;
/// impl PubSubBackend for Store {}
///
/// let (stream, _inbox) = mpsc::unbounded::<Element>();
/// let service = PubSubServiceBuilder::new(Store, stream)
///     .set_identity("pubsub", "service", "Princely musings")
///     .enable_feature(PubSubFeature::Publish)
///     .enable_feature(PubSubFeature::Subscribe)
///     .build();
/// # let _ = service;
/// ```
pub struct PubSubServiceBuilder<B, S> {
    backend: B,
    stream: S,
    identity: Identity,
    features: Vec<PubSubFeature>,
    hide_nodes: bool,
}

impl<B, S> PubSubServiceBuilder<B, S> {
    /// Start building a service around a backend and an outbound stanza
    /// stream.
    pub fn new(backend: B, stream: S) -> PubSubServiceBuilder<B, S> {
        PubSubServiceBuilder {
            backend,
            stream,
            identity: Identity {
                category: String::from("pubsub"),
                type_: String::from("generic"),
                lang: None,
                name: Some(String::from("Generic Publish-Subscribe Service")),
            },
            features: Vec::new(),
            hide_nodes: false,
        }
    }

    /// Override the service discovery identity.
    pub fn set_identity(mut self, category: &str, type_: &str, name: &str) -> Self {
        self.identity = Identity {
            category: String::from(category),
            type_: String::from(type_),
            lang: None,
            name: Some(String::from(name)),
        };
        self
    }

    /// Advertise a publish-subscribe feature in disco#info.
    pub fn enable_feature(mut self, feature: PubSubFeature) -> Self {
        self.features.push(feature);
        self
    }

    /// Keep the node list out of disco#items.
    pub fn hide_nodes(mut self) -> Self {
        self.hide_nodes = true;
        self
    }

    /// Finish the builder.
    pub fn build(self) -> PubSubService<B, S> {
        PubSubService {
            backend: self.backend,
            stream: self.stream,
            identity: self.identity,
            features: self.features,
            hide_nodes: self.hide_nodes,
        }
    }
}

impl<B, S> PubSubService<B, S> {
    /// The backend this service dispatches to.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B, S> PubSubService<B, S>
where
    B: PubSubBackend,
    S: Sink<Element> + Unpin,
{
    /// Handle one inbound stanza.
    ///
    /// Returns `true` when the stanza was a publish-subscribe request and
    /// a response has been produced, `false` when the stanza is none of
    /// our business and should be routed elsewhere.
    pub async fn handle_iq(&mut self, iq: &Element) -> bool {
        if iq.name() != "iq" {
            return false;
        }
        let kind = match iq.attr("type") {
            Some("get") => IqKind::Get,
            Some("set") => IqKind::Set,
            _ => return false,
        };
        let Some((command, child)) = iq
            .children()
            .find_map(|payload| Command::match_request(kind, payload))
        else {
            return false;
        };

        debug!("{:?} request from {:?}", command, iq.attr("from"));
        let response = match self.dispatch(command, iq, child).await {
            Ok(payload) => response::result_iq(iq, payload),
            Err(error) => {
                if let PubSubError::Internal(reason) = &error {
                    error!("{:?} request failed unexpectedly: {}", command, reason);
                }
                response::error_iq(iq, error.into_stanza_error())
            }
        };
        self.send_stanza(response).await;
        true
    }

    /// Send notification messages for a publish event.
    ///
    /// One `<message/>` is built per `(recipient, items)` pair, in the
    /// order given, carrying the items verbatim below
    /// `<event xmlns='…#event'><items node='…'/>`.  Delivery is
    /// best-effort; there is no acknowledgement or retry.
    pub async fn notify_publish(
        &mut self,
        entity: &Jid,
        node: &NodeName,
        notifications: Vec<(Jid, Vec<Element>)>,
    ) {
        for (recipient, items) in notifications {
            let message = Element::builder("message", ns::COMPONENT_ACCEPT)
                .attr("from", entity.clone())
                .attr("to", recipient)
                .append(
                    Element::builder("event", ns::PUBSUB_EVENT).append(
                        Element::builder("items", ns::PUBSUB_EVENT)
                            .attr("node", node.0.as_str())
                            .append_all(items),
                    ),
                )
                .build();
            self.send_stanza(message).await;
        }
    }

    /// Hand a stanza to the outbound stream.  A closed stream swallows
    /// the stanza.
    pub async fn send_stanza(&mut self, stanza: Element) {
        if self.stream.send(stanza).await.is_err() {
            debug!("outbound stream closed, dropping stanza");
        }
    }

    async fn dispatch(
        &self,
        command: Command,
        iq: &Element,
        child: &Element,
    ) -> Result<Option<Element>, PubSubError> {
        let requestor = requestor(iq)?;

        match command {
            Command::Publish => {
                let req = request::publish(requestor, child)?;
                self.backend
                    .publish(req.requestor, req.node, req.items)
                    .await?;
                Ok(None)
            }
            Command::Subscribe => {
                let req = request::subscribe(requestor, child)?;
                let subscriber = req.subscriber.clone();
                let (node, state) = self
                    .backend
                    .subscribe(req.requestor, req.node, req.subscriber)
                    .await?;
                Ok(Some(response::subscription(&node, &subscriber, state)))
            }
            Command::Unsubscribe => {
                let req = request::unsubscribe(requestor, child)?;
                self.backend
                    .unsubscribe(req.requestor, req.node, req.subscriber)
                    .await?;
                Ok(None)
            }
            Command::OptionsGet => self.backend.options_get(requestor, child.clone()).await,
            Command::OptionsSet => self.backend.options_set(requestor, child.clone()).await,
            Command::Subscriptions => {
                let entries = self.backend.subscriptions(requestor).await?;
                Ok(Some(response::subscriptions(entries)))
            }
            Command::Affiliations => {
                let entries = self.backend.affiliations(requestor).await?;
                Ok(Some(response::affiliations(entries)))
            }
            Command::Create => {
                let req = request::create(requestor, child)?;
                let requested = req.node.clone();
                let created = self.backend.create(req.requestor, req.node).await?;
                if created.0.is_empty() {
                    return Err(PubSubError::BadRequest);
                }
                if requested.as_ref() == Some(&created) {
                    Ok(None)
                } else {
                    Ok(Some(response::create(&created)))
                }
            }
            Command::Items => {
                let req = request::items(requestor, child)?;
                let items = self
                    .backend
                    .items(req.requestor, req.node.clone(), req.max_items, req.item_ids)
                    .await?;
                Ok(Some(response::items(&req.node, items)))
            }
            Command::Retract => {
                let req = request::retract(requestor, child)?;
                self.backend
                    .retract(req.requestor, req.node, req.item_ids)
                    .await?;
                Ok(None)
            }
            Command::Default => {
                let fields = self.backend.get_default_configuration(requestor).await?;
                Ok(Some(response::default_configuration(fields)))
            }
            Command::ConfigureGet => {
                let req = request::configure_get(requestor, child)?;
                let fields = self
                    .backend
                    .get_configuration(req.requestor, req.node.clone())
                    .await?;
                Ok(Some(response::configuration(req.node.as_ref(), fields)))
            }
            Command::ConfigureSet => {
                let req = request::configure_set(requestor, child)?;
                if let Some(options) = req.options {
                    self.backend
                        .set_configuration(req.requestor, req.node, options)
                        .await?;
                }
                Ok(None)
            }
            Command::Purge => {
                let req = request::node_only(requestor, child)?;
                self.backend.purge(req.requestor, req.node).await?;
                Ok(None)
            }
            Command::Delete => {
                let req = request::node_only(requestor, child)?;
                self.backend.delete(req.requestor, req.node).await?;
                Ok(None)
            }
            Command::AffiliationsGet => {
                self.backend
                    .manage_affiliations_get(requestor, child.clone())
                    .await
            }
            Command::AffiliationsSet => {
                self.backend
                    .manage_affiliations_set(requestor, child.clone())
                    .await
            }
            Command::SubscriptionsGet => {
                self.backend
                    .manage_subscriptions_get(requestor, child.clone())
                    .await
            }
            Command::SubscriptionsSet => {
                self.backend
                    .manage_subscriptions_set(requestor, child.clone())
                    .await
            }
        }
    }
}

/// The bare address every backend call is made on behalf of.
fn requestor(iq: &Element) -> Result<BareJid, PubSubError> {
    let from = iq.attr("from").ok_or(PubSubError::BadRequest)?;
    let jid: Jid = from.parse().map_err(|_| PubSubError::BadRequest)?;
    Ok(jid.to_bare())
}
