//! `NftSimulator`: ledger en proceso que implementa `ChainClient`.
//!
//! Modela lo justo de los contratos que tocan los scripts: loot con items
//! separables (`legoot`), NFTs componibles que absorben tokens de otra
//! colección (`metacore`), la factory y el contrato de atributos ERC-3664,
//! más un `deployer` que despliega los contratos de la migración inicial.
//! Cada escritura es atómica: primero se validan todas las condiciones y
//! sólo después se muta el estado, así un revert no deja cambios a medias.
use async_trait::async_trait;
use log::debug;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};

use mint_core::{ChainClient, ChainError, ContractRegistry, Receipt, SendOptions, SignerHandle};
use mint_domain::{Address, FunctionSignature};

use crate::scripts::{deploy, legoot, nft_factory, BuiltinScript, ScriptAddresses};

const BASE_GAS: u64 = 21_000;
const GAS_PER_WORD: u64 = 20_000;
/// Ids válidos de un loot; por encima empiezan los items separados.
const MAX_LOOT_ID: u64 = 8000;

type Revert = String;

#[derive(Debug, Default)]
struct Loot {
    owners: BTreeMap<u64, Address>,
    approvals: HashMap<u64, Address>,
    parts: BTreeMap<u64, BTreeSet<u64>>,
}

#[derive(Debug, Default)]
struct Composable {
    owners: BTreeMap<u64, Address>,
    names: BTreeMap<u64, String>,
    slots: BTreeMap<u64, Vec<(Address, u64)>>,
    next_id: u64,
}

#[derive(Debug, Default)]
struct Factory {
    registered: BTreeMap<u64, Address>,
    owners: BTreeMap<u64, Address>,
    names: BTreeMap<u64, String>,
    next_id: u64,
}

#[derive(Debug, Default)]
struct Attributes {
    attrs: BTreeMap<u64, (String, String, String)>,
    balances: BTreeMap<(u64, u64), u64>,
    roles: BTreeSet<(String, Address)>,
}

#[derive(Debug, Default)]
struct Deployer {
    nonce: u64,
}

/// Contrato desplegado sin más lógica que sus getters de constructor.
#[derive(Debug)]
struct Deployed {
    kind: &'static str,
    fields: BTreeMap<&'static str, Value>,
}

#[derive(Debug)]
enum Contract {
    Loot(Loot),
    Composable(Composable),
    Factory(Factory),
    Attributes(Attributes),
    Deployer(Deployer),
    Deployed(Deployed),
}

#[derive(Debug, Default)]
struct Ledger {
    contracts: HashMap<Address, Contract>,
    block: u64,
}

pub struct NftSimulator {
    ledger: Mutex<Ledger>,
}

impl Default for NftSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl NftSimulator {
    pub fn new() -> Self {
        Self { ledger: Mutex::new(Ledger::default()) }
    }

    fn deploy(mut self, address: Address, contract: Contract) -> Self {
        self.ledger
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .contracts
            .insert(address, contract);
        self
    }

    pub fn with_loot(self, address: Address) -> Self {
        self.deploy(address, Contract::Loot(Loot::default()))
    }

    pub fn with_composable(self, address: Address) -> Self {
        self.deploy(address, Contract::Composable(Composable { next_id: 1, ..Default::default() }))
    }

    /// Factory con atributos ya registrados (`attrType -> contrato`).
    pub fn with_factory(self, address: Address, registered: &[(u64, Address)]) -> Self {
        let factory = Factory { registered: registered.iter().cloned().collect(),
                                next_id: 1,
                                ..Default::default() };
        self.deploy(address, Contract::Factory(factory))
    }

    pub fn with_attributes(self, address: Address) -> Self {
        self.deploy(address, Contract::Attributes(Attributes::default()))
    }

    pub fn with_deployer(self, address: Address) -> Self {
        self.deploy(address, Contract::Deployer(Deployer::default()))
    }

    /// Despliega los contratos que usa un script integrado.
    pub fn for_script(script: BuiltinScript, addresses: &ScriptAddresses) -> Self {
        let mut sim = Self::new();
        let get = |name: &str| addresses.get(name).cloned();
        match script {
            BuiltinScript::Legoot => {
                if let Some(a) = get("legoot") {
                    sim = sim.with_loot(a);
                }
            }
            BuiltinScript::Metacore => {
                if let Some(a) = get("legoot") {
                    sim = sim.with_loot(a);
                }
                if let Some(a) = get("metacore") {
                    sim = sim.with_composable(a);
                }
            }
            BuiltinScript::NftFactory => {
                if let Some(generic) = get("generic_attr") {
                    if let Some(f) = get("nft_factory") {
                        sim = sim.with_factory(f, &[(nft_factory::GENERIC_ATTRIBUTE_TYPE, generic.clone())]);
                    }
                    sim = sim.with_attributes(generic);
                }
            }
            BuiltinScript::Deploy => {
                if let Some(a) = get("deployer") {
                    sim = sim.with_deployer(a);
                }
            }
        }
        sim
    }

    /// Despliega cada contrato del registro según las funciones de su ABI.
    /// Los que no encajan con ningún modelo se omiten (sus llamadas revierten).
    pub fn for_registry(registry: &ContractRegistry) -> Self {
        let mut sim = Self::new();
        let mut factories = Vec::new();
        let mut attributes = None;
        for name in registry.names() {
            let Ok(d) = registry.resolve(name) else { continue };
            let abi = d.abi();
            let address = d.address().clone();
            if abi.resolve("combine", 3).is_some() {
                sim = sim.with_composable(address);
            } else if abi.resolve("combine", 2).is_some() || abi.resolve("separateOne", 2).is_some() {
                sim = sim.with_loot(address);
            } else if abi.contains("createNFT") {
                factories.push(address);
            } else if abi.contains("deployNFTFactory") {
                sim = sim.with_deployer(address);
            } else if abi.contains("mintBatch") {
                attributes = Some(address.clone());
                sim = sim.with_attributes(address);
            } else {
                debug!("sim: no model for contract `{name}`");
            }
        }
        let registered: Vec<(u64, Address)> = attributes.map(|a| vec![(nft_factory::GENERIC_ATTRIBUTE_TYPE, a)]).unwrap_or_default();
        for f in factories {
            sim = sim.with_factory(f, &registered);
        }
        sim
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Dueño actual de un token, si existe.
    pub fn owner_of(&self, contract: &Address, token_id: u64) -> Option<Address> {
        match self.lock().contracts.get(contract)? {
            Contract::Loot(l) => l.owners.get(&token_id).cloned(),
            Contract::Composable(c) => c.owners.get(&token_id).cloned(),
            Contract::Factory(f) => f.owners.get(&token_id).cloned(),
            Contract::Attributes(_) | Contract::Deployer(_) | Contract::Deployed(_) => None,
        }
    }

    /// Tipo de contrato desplegado en `address` (`"NFTFactory"`, `"DRepublic"`...).
    pub fn kind_at(&self, address: &Address) -> Option<&'static str> {
        match self.lock().contracts.get(address)? {
            Contract::Loot(_) => Some("Loot"),
            Contract::Composable(_) => Some("Composable"),
            Contract::Factory(_) => Some("NFTFactory"),
            Contract::Attributes(_) => Some("ERC3664Generic"),
            Contract::Deployer(_) => Some("Deployer"),
            Contract::Deployed(d) => Some(d.kind),
        }
    }

    pub fn block_number(&self) -> u64 {
        self.lock().block
    }
}

fn uint(args: &[Value], i: usize) -> Result<u64, Revert> {
    match args.get(i) {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }.ok_or_else(|| format!("argument #{i} is not a uint"))
}

fn uints(args: &[Value], i: usize) -> Result<Vec<u64>, Revert> {
    let items = args.get(i)
                    .and_then(Value::as_array)
                    .ok_or_else(|| format!("argument #{i} is not an array"))?;
    (0..items.len()).map(|j| uint(items, j)).collect()
}

fn text(args: &[Value], i: usize) -> Result<String, Revert> {
    args.get(i)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| format!("argument #{i} is not a string"))
}

fn texts(args: &[Value], i: usize) -> Result<Vec<String>, Revert> {
    let items = args.get(i)
                    .and_then(Value::as_array)
                    .ok_or_else(|| format!("argument #{i} is not an array"))?;
    (0..items.len()).map(|j| text(items, j)).collect()
}

fn address(args: &[Value], i: usize) -> Result<Address, Revert> {
    text(args, i).and_then(|s| Address::parse(&s).map_err(|e| e.to_string()))
}

fn data_uri(body: Value) -> String {
    format!("data:application/json,{body}")
}

fn transfer_log(from: &Address, to: &Address, token_id: u64) -> Value {
    json!({ "event": "Transfer", "from": from.as_str(), "to": to.as_str(), "tokenId": token_id })
}

// Palabras de 32 bytes aproximadas: un argumento escalar cuenta 1, un array
// cuenta 1 + su longitud.
fn estimate_gas(args: &[Value]) -> u64 {
    let words: u64 = args.iter()
                         .map(|a| match a {
                             Value::Array(items) => 1 + items.len() as u64,
                             _ => 1,
                         })
                         .sum();
    BASE_GAS + GAS_PER_WORD * words
}

impl Ledger {
    fn loot(&self, at: &Address) -> Result<&Loot, Revert> {
        match self.contracts.get(at) {
            Some(Contract::Loot(l)) => Ok(l),
            _ => Err(format!("{at} is not a loot contract")),
        }
    }

    fn loot_mut(&mut self, at: &Address) -> Result<&mut Loot, Revert> {
        match self.contracts.get_mut(at) {
            Some(Contract::Loot(l)) => Ok(l),
            _ => Err(format!("{at} is not a loot contract")),
        }
    }

    fn read(&self, at: &Address, function: &str, args: &[Value]) -> Result<Value, Revert> {
        let contract = self.contracts.get(at).ok_or_else(|| format!("no contract deployed at {at}"))?;
        match (contract, function) {
            (Contract::Loot(l), "ownerOf") => owner(&l.owners, uint(args, 0)?).map(|a| json!(a.as_str())),
            (Contract::Loot(l), "tokenURI") => {
                let id = uint(args, 0)?;
                owner(&l.owners, id)?;
                let items: Vec<u64> = l.parts.get(&id).map(|p| p.iter().copied().collect()).unwrap_or_default();
                Ok(json!(data_uri(json!({ "name": format!("Bag #{id}"), "items": items }))))
            }
            (Contract::Composable(c), "ownerOf") => owner(&c.owners, uint(args, 0)?).map(|a| json!(a.as_str())),
            (Contract::Composable(c), "tokenURI") => {
                let id = uint(args, 0)?;
                owner(&c.owners, id)?;
                let components: Vec<Value> = c.slots
                                              .get(&id)
                                              .map(|s| {
                                                  s.iter()
                                                   .map(|(col, sub)| json!({ "collection": col.as_str(), "tokenId": sub }))
                                                   .collect()
                                              })
                                              .unwrap_or_default();
                let name = c.names.get(&id).cloned().unwrap_or_default();
                Ok(json!(data_uri(json!({ "name": name, "components": components }))))
            }
            (Contract::Factory(f), "attributes") => {
                let ty = uint(args, 0)?;
                Ok(json!(f.registered.get(&ty).cloned().unwrap_or_else(Address::zero).as_str()))
            }
            (Contract::Factory(f), "ownerOf") => owner(&f.owners, uint(args, 0)?).map(|a| json!(a.as_str())),
            (Contract::Attributes(a), "balanceOf") => {
                let key = (uint(args, 0)?, uint(args, 1)?);
                Ok(json!(a.balances.get(&key).copied().unwrap_or(0)))
            }
            (Contract::Deployed(d), getter) if args.is_empty() => {
                d.fields.get(getter).cloned().ok_or_else(|| format!("function {getter} is not readable on {at}"))
            }
            _ => Err(format!("function {function} is not readable on {at}")),
        }
    }

    fn write(&mut self, at: &Address, function: &str, args: &[Value], from: &Address) -> Result<Vec<Value>, Revert> {
        // Operaciones que tocan más de un contrato.
        match (self.contracts.get(at), function) {
            (Some(Contract::Composable(_)), "combine") => {
                return self.composable_combine(at, uint(args, 0)?, address(args, 1)?, uint(args, 2)?, from)
            }
            (Some(Contract::Composable(_)), "separateOne") => {
                return self.composable_separate(at, uint(args, 0)?, Some(uint(args, 1)?), from)
            }
            (Some(Contract::Composable(_)), "separate") => return self.composable_separate(at, uint(args, 0)?, None, from),
            (Some(Contract::Factory(_)), "createNFT") => return self.factory_create(at, args),
            (Some(Contract::Deployer(_)), _) => return self.deployer_deploy(at, function, args, from),
            _ => {}
        }
        let contract = self.contracts.get_mut(at).ok_or_else(|| format!("no contract deployed at {at}"))?;
        match (contract, function) {
            (Contract::Loot(l), "claim") => loot_claim(l, uint(args, 0)?, from),
            (Contract::Loot(l), "approve") => loot_approve(l, address(args, 0)?, uint(args, 1)?, from),
            (Contract::Loot(l), "separateOne") => loot_separate(l, uint(args, 0)?, Some(uint(args, 1)?), from),
            (Contract::Loot(l), "separate") => loot_separate(l, uint(args, 0)?, None, from),
            (Contract::Loot(l), "combine") => loot_combine(l, uint(args, 0)?, &uints(args, 1)?, from),
            (Contract::Composable(c), "claim") => {
                let name = text(args, 0)?;
                let id = c.next_id;
                c.next_id += 1;
                c.owners.insert(id, from.clone());
                c.names.insert(id, name);
                Ok(vec![transfer_log(&Address::zero(), from, id)])
            }
            (Contract::Factory(f), "registerAttribute") => {
                let ty = uint(args, 0)?;
                let attr = address(args, 1)?;
                f.registered.insert(ty, attr.clone());
                Ok(vec![json!({ "event": "AttributeRegistered", "attrType": ty, "attr": attr.as_str() })])
            }
            (Contract::Attributes(a), "mintBatch") => attributes_mint(a, args),
            (Contract::Attributes(a), "grantRole") => {
                let role = text(args, 0)?;
                let account = address(args, 1)?;
                a.roles.insert((role.clone(), account.clone()));
                Ok(vec![json!({ "event": "RoleGranted", "role": role, "account": account.as_str() })])
            }
            _ => Err(format!("function {function} is not writable on {at}")),
        }
    }

    fn composable_combine(&mut self,
                          at: &Address,
                          id: u64,
                          collection: Address,
                          sub_id: u64,
                          from: &Address)
                          -> Result<Vec<Value>, Revert> {
        let Some(Contract::Composable(c)) = self.contracts.get(at) else {
            return Err(format!("{at} is not a composable contract"));
        };
        if owner(&c.owners, id)? != from {
            return Err("caller is not token owner".into());
        }
        let loot = self.loot(&collection)?;
        if owner(&loot.owners, sub_id)? != from {
            return Err("ERC721: transfer of token that is not own".into());
        }
        if loot.approvals.get(&sub_id) != Some(at) {
            return Err("ERC721: transfer caller is not owner nor approved".into());
        }

        let loot = self.loot_mut(&collection)?;
        loot.approvals.remove(&sub_id);
        loot.owners.insert(sub_id, at.clone());
        if let Some(Contract::Composable(c)) = self.contracts.get_mut(at) {
            c.slots.entry(id).or_default().push((collection.clone(), sub_id));
        }
        Ok(vec![transfer_log(from, at, sub_id),
                json!({ "event": "Combine", "tokenId": id, "collection": collection.as_str(), "subId": sub_id })])
    }

    fn composable_separate(&mut self, at: &Address, id: u64, sub_id: Option<u64>, from: &Address) -> Result<Vec<Value>, Revert> {
        let Some(Contract::Composable(c)) = self.contracts.get(at) else {
            return Err(format!("{at} is not a composable contract"));
        };
        if owner(&c.owners, id)? != from {
            return Err("caller is not token owner".into());
        }
        let slots = c.slots.get(&id).cloned().unwrap_or_default();
        let released: Vec<(Address, u64)> = match sub_id {
            Some(sub) => {
                let slot = slots.iter()
                                .find(|(_, s)| *s == sub)
                                .cloned()
                                .ok_or_else(|| format!("token {sub} is not combined into {id}"))?;
                vec![slot]
            }
            None if slots.is_empty() => return Err("nothing to separate".into()),
            None => slots,
        };
        for (collection, _) in &released {
            self.loot(collection)?;
        }

        let mut logs = Vec::with_capacity(released.len());
        for (collection, sub) in &released {
            self.loot_mut(collection)?.owners.insert(*sub, from.clone());
            logs.push(transfer_log(at, from, *sub));
        }
        if let Some(Contract::Composable(c)) = self.contracts.get_mut(at) {
            if let Some(s) = c.slots.get_mut(&id) {
                s.retain(|slot| !released.contains(slot));
            }
        }
        Ok(logs)
    }

    fn is_deployed(&self, at: &Address, kind: &str) -> bool {
        match self.contracts.get(at) {
            Some(Contract::Factory(_)) => kind == "NFTFactory",
            Some(Contract::Deployed(d)) => d.kind == kind,
            _ => false,
        }
    }

    fn require_deployed(&self, args: &[Value], i: usize, kind: &str) -> Result<Value, Revert> {
        let a = address(args, i)?;
        if !self.is_deployed(&a, kind) {
            return Err(format!("{a} is not a deployed {kind}"));
        }
        Ok(json!(a.as_str()))
    }

    fn deployer_deploy(&mut self, at: &Address, function: &str, args: &[Value], from: &Address) -> Result<Vec<Value>, Revert> {
        let (kind, contract) = match function {
            "deployNFTFactory" => {
                text(args, 0)?;
                text(args, 1)?;
                text(args, 2)?;
                ("NFTFactory", Contract::Factory(Factory { next_id: 1, ..Default::default() }))
            }
            "deployDRepublic" => {
                // El supply inicial no cabe en u64: se guarda como texto decimal.
                let supply = match args.get(2) {
                    Some(Value::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => json!(s),
                    Some(Value::Number(n)) if n.is_u64() => json!(n.to_string()),
                    _ => return Err("argument #2 is not a uint".into()),
                };
                let fields = BTreeMap::from([("name", json!(text(args, 0)?)),
                                             ("symbol", json!(text(args, 1)?)),
                                             ("totalSupply", supply),
                                             ("owner", json!(from.as_str()))]);
                ("DRepublic", Contract::Deployed(Deployed { kind: "DRepublic", fields }))
            }
            "deployNFTBlindBox" => {
                let fields = BTreeMap::from([("factory", self.require_deployed(args, 0, "NFTFactory")?),
                                             ("token", self.require_deployed(args, 1, "DRepublic")?)]);
                ("NFTBlindBox", Contract::Deployed(Deployed { kind: "NFTBlindBox", fields }))
            }
            "deployNFTIncubator" => {
                let fields = BTreeMap::from([("factory", self.require_deployed(args, 0, "NFTFactory")?),
                                             ("blindBox", self.require_deployed(args, 1, "NFTBlindBox")?)]);
                ("NFTIncubator", Contract::Deployed(Deployed { kind: "NFTIncubator", fields }))
            }
            other => return Err(format!("deployer has no function {other}")),
        };

        let Some(Contract::Deployer(d)) = self.contracts.get_mut(at) else {
            return Err(format!("{at} is not a deployer"));
        };
        d.nonce += 1;
        let digest = blake3::hash(format!("{at}:{}", d.nonce).as_bytes()).to_hex();
        let address = Address::parse(&format!("0x{}", &digest[..Address::HEX_LEN])).map_err(|e| e.to_string())?;
        self.contracts.insert(address.clone(), contract);
        Ok(vec![json!({ "event": "ContractDeployed", "contract": kind, "contractAddress": address.as_str() })])
    }

    fn factory_create(&mut self, at: &Address, args: &[Value]) -> Result<Vec<Value>, Revert> {
        let recipient = address(args, 0)?;
        let name = text(args, 1)?;
        let ids = uints(args, 2)?;
        let values = uints(args, 3)?;
        if ids.len() != values.len() {
            return Err("NFTFactory: attrIds and values length mismatch".into());
        }
        let Some(Contract::Factory(f)) = self.contracts.get(at) else {
            return Err(format!("{at} is not a factory contract"));
        };
        let generic = f.registered
                       .get(&nft_factory::GENERIC_ATTRIBUTE_TYPE)
                       .cloned()
                       .ok_or_else(|| "NFTFactory: attribute contract not registered".to_string())?;
        let token_id = f.next_id;
        match self.contracts.get(&generic) {
            Some(Contract::Attributes(a)) => {
                if let Some(missing) = ids.iter().find(|id| !a.attrs.contains_key(*id)) {
                    return Err(format!("ERC3664: nonexistent attribute {missing}"));
                }
            }
            _ => return Err(format!("{generic} is not an attribute contract")),
        }

        if let Some(Contract::Attributes(a)) = self.contracts.get_mut(&generic) {
            for (id, v) in ids.iter().zip(&values) {
                a.balances.insert((token_id, *id), *v);
            }
        }
        if let Some(Contract::Factory(f)) = self.contracts.get_mut(at) {
            f.next_id += 1;
            f.owners.insert(token_id, recipient.clone());
            f.names.insert(token_id, name.clone());
        }
        Ok(vec![transfer_log(&Address::zero(), &recipient, token_id),
                json!({ "event": "NFTCreated", "tokenId": token_id, "name": name, "attrIds": ids, "values": values })])
    }
}

fn owner(owners: &BTreeMap<u64, Address>, id: u64) -> Result<&Address, Revert> {
    owners.get(&id)
          .ok_or_else(|| format!("ERC721: owner query for nonexistent token {id}"))
}

fn loot_claim(l: &mut Loot, id: u64, from: &Address) -> Result<Vec<Value>, Revert> {
    if id == 0 || id > MAX_LOOT_ID {
        return Err("Token ID invalid".into());
    }
    if l.owners.contains_key(&id) {
        return Err("ERC721: token already minted".into());
    }
    let first = legoot::first_item_of(id);
    l.owners.insert(id, from.clone());
    l.parts.insert(id, (first..first + legoot::ITEMS_PER_LOOT).collect());
    Ok(vec![transfer_log(&Address::zero(), from, id)])
}

fn loot_approve(l: &mut Loot, to: Address, id: u64, from: &Address) -> Result<Vec<Value>, Revert> {
    let current = owner(&l.owners, id)?;
    if &to == current {
        return Err("ERC721: approval to current owner".into());
    }
    if current != from {
        return Err("ERC721: approve caller is not owner nor approved for all".into());
    }
    l.approvals.insert(id, to.clone());
    Ok(vec![json!({ "event": "Approval", "owner": from.as_str(), "approved": to.as_str(), "tokenId": id })])
}

fn loot_separate(l: &mut Loot, id: u64, item: Option<u64>, from: &Address) -> Result<Vec<Value>, Revert> {
    if owner(&l.owners, id)? != from {
        return Err("caller is not token owner".into());
    }
    let parts = l.parts.get(&id).cloned().unwrap_or_default();
    let released: Vec<u64> = match item {
        Some(i) if parts.contains(&i) => vec![i],
        Some(i) => return Err(format!("item {i} is not part of token {id}")),
        None if parts.is_empty() => return Err("nothing to separate".into()),
        None => parts.into_iter().collect(),
    };
    let mut logs = Vec::with_capacity(released.len());
    for i in &released {
        l.owners.insert(*i, from.clone());
        logs.push(transfer_log(&Address::zero(), from, *i));
    }
    if let Some(p) = l.parts.get_mut(&id) {
        p.retain(|i| !released.contains(i));
    }
    Ok(logs)
}

fn loot_combine(l: &mut Loot, id: u64, items: &[u64], from: &Address) -> Result<Vec<Value>, Revert> {
    if owner(&l.owners, id)? != from {
        return Err("caller is not token owner".into());
    }
    let first = legoot::first_item_of(id);
    for i in items {
        if !(first..first + legoot::ITEMS_PER_LOOT).contains(i) {
            return Err(format!("item {i} does not belong to token {id}"));
        }
        if owner(&l.owners, *i)? != from {
            return Err(format!("caller is not owner of item {i}"));
        }
    }
    let mut logs = Vec::with_capacity(items.len());
    for i in items {
        l.owners.remove(i);
        l.parts.entry(id).or_default().insert(*i);
        logs.push(transfer_log(from, &Address::zero(), *i));
    }
    Ok(logs)
}

fn attributes_mint(a: &mut Attributes, args: &[Value]) -> Result<Vec<Value>, Revert> {
    let ids = uints(args, 0)?;
    let names = texts(args, 1)?;
    let symbols = texts(args, 2)?;
    let uris = texts(args, 3)?;
    if names.len() != ids.len() || symbols.len() != ids.len() || uris.len() != ids.len() {
        return Err("ERC3664: ids and metadata length mismatch".into());
    }
    if let Some(dup) = ids.iter().find(|id| a.attrs.contains_key(*id)) {
        return Err(format!("ERC3664: attribute {dup} already exists"));
    }
    let mut logs = Vec::with_capacity(ids.len());
    for (((id, name), symbol), uri) in ids.iter().zip(names).zip(symbols).zip(uris) {
        logs.push(json!({ "event": "AttributeCreated", "attrId": id, "name": name, "symbol": symbol }));
        a.attrs.insert(*id, (name, symbol, uri));
    }
    Ok(logs)
}

#[async_trait]
impl ChainClient for NftSimulator {
    async fn call(&self, contract: &Address, function: &FunctionSignature, args: &[Value]) -> Result<Value, ChainError> {
        self.lock()
            .read(contract, &function.name, args)
            .map_err(ChainError::Reverted)
    }

    async fn send(&self,
                  contract: &Address,
                  function: &FunctionSignature,
                  args: &[Value],
                  signer: &SignerHandle,
                  options: &SendOptions)
                  -> Result<Receipt, ChainError> {
        let gas_used = estimate_gas(args);
        if let Some(limit) = options.gas_limit {
            if gas_used > limit {
                return Err(ChainError::Reverted(format!("out of gas: needs {gas_used}, limit {limit}")));
            }
        }
        let mut ledger = self.lock();
        let logs = ledger.write(contract, &function.name, args, signer.address())
                         .map_err(ChainError::Reverted)?;
        ledger.block += 1;
        let block_number = ledger.block;
        let transaction_hash = format!("0x{}",
                                       blake3::hash(json!({
                                                        "block": block_number,
                                                        "to": contract.as_str(),
                                                        "from": signer.address().as_str(),
                                                        "signature": function.signature(),
                                                        "args": args,
                                                    }).to_string()
                                                      .as_bytes()).to_hex());
        debug!("sim: {} on {contract} mined in block {block_number}", function.signature());
        Ok(Receipt { transaction_hash,
                     block_number,
                     status: true,
                     gas_used,
                     logs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mint_domain::ContractAbi;

    fn addr(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn f(src: &str) -> FunctionSignature {
        ContractAbi::from_human(&[src]).unwrap().functions()[0].clone()
    }

    #[tokio::test]
    async fn loot_claim_is_unique() {
        let sim = NftSimulator::new().with_loot(addr(1));
        let me = SignerHandle::new(addr(9), "k");
        let claim = f("claim(uint256)");
        sim.send(&addr(1), &claim, &[json!(1)], &me, &SendOptions::default()).await.unwrap();
        let err = sim.send(&addr(1), &claim, &[json!(1)], &me, &SendOptions::default()).await.unwrap_err();
        assert_eq!(err, ChainError::Reverted("ERC721: token already minted".into()));
        assert_eq!(sim.owner_of(&addr(1), 1), Some(addr(9)));
        assert_eq!(sim.block_number(), 1);
    }

    #[tokio::test]
    async fn revert_leaves_state_untouched() {
        let sim = NftSimulator::new().with_loot(addr(1));
        let me = SignerHandle::new(addr(9), "k");
        sim.send(&addr(1), &f("claim(uint256)"), &[json!(1)], &me, &SendOptions::default()).await.unwrap();
        // 8009 pertenece al loot 2
        let err = sim.send(&addr(1), &f("combine(uint256,uint256[])"), &[json!(1), json!([8009])], &me, &SendOptions::default())
                     .await
                     .unwrap_err();
        assert!(matches!(err, ChainError::Reverted(_)));
        let uri = sim.call(&addr(1), &f("tokenURI(uint256) view returns (string)"), &[json!(1)]).await.unwrap();
        assert!(uri.as_str().unwrap().contains("8008"));
    }

    #[tokio::test]
    async fn gas_limit_is_enforced() {
        let sim = NftSimulator::new().with_loot(addr(1));
        let me = SignerHandle::new(addr(9), "k");
        let opts = SendOptions { gas_limit: Some(30_000) };
        let err = sim.send(&addr(1), &f("claim(uint256)"), &[json!(1)], &me, &opts).await.unwrap_err();
        assert!(matches!(err, ChainError::Reverted(m) if m.starts_with("out of gas")));
        assert_eq!(sim.owner_of(&addr(1), 1), None);
    }

    #[tokio::test]
    async fn deployer_checks_constructor_addresses() {
        let sim = NftSimulator::new().with_deployer(addr(5));
        let me = SignerHandle::new(addr(9), "k");
        let blind_box = f("deployNFTBlindBox(address,address) returns (address)");
        let err = sim.send(&addr(5), &blind_box, &[json!(addr(1).as_str()), json!(addr(2).as_str())], &me, &SendOptions::default())
                     .await
                     .unwrap_err();
        assert!(matches!(err, ChainError::Reverted(m) if m.contains("not a deployed NFTFactory")));

        let factory = f("deployNFTFactory(string,string,string) returns (address)");
        let receipt = sim.send(&addr(5), &factory, &[json!("n"), json!("s"), json!("u")], &me, &SendOptions::default())
                         .await
                         .unwrap();
        let deployed = Address::parse(receipt.logs[0]["contractAddress"].as_str().unwrap()).unwrap();
        assert_eq!(sim.kind_at(&deployed), Some("NFTFactory"));
        assert_eq!(sim.block_number(), 1);
    }

    #[tokio::test]
    async fn unknown_address_reverts() {
        let sim = NftSimulator::new();
        let err = sim.call(&addr(3), &f("ownerOf(uint256) view returns (address)"), &[json!(1)]).await.unwrap_err();
        assert!(matches!(err, ChainError::Reverted(m) if m.contains("no contract")));
    }
}
