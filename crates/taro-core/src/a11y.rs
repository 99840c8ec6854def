//! The ARIA vocabulary and the accessibility tree widgets produce.
//!
//! A widget's [`semantics`](crate::Component::semantics) returns an
//! [`AccessNode`] tree: one node per element the consumer is expected to
//! render, carrying its role, `tabindex` and `aria-*` attributes. The consumer
//! supplies markup and styling; the tree is the contract for everything
//! assistive technology sees.
//!
//! ```
//! use taro_core::a11y::{AccessNode, Attr, Role, TabIndex};
//! use taro_core::ElementId;
//!
//! let node = AccessNode::new(ElementId::new("save"))
//!     .role(Role::Button)
//!     .text("Save")
//!     .tab_index(TabIndex::Tabbable)
//!     .attr(Attr::Pressed, false);
//!
//! assert_eq!(node.to_string(), "button #save \"Save\" tabindex=0 [aria-pressed=false]");
//! ```

use crate::id::ElementId;
use std::collections::BTreeMap;
use std::fmt;

/// WAI-ARIA roles used by the widgets in this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Alert,
    AlertDialog,
    Button,
    Combobox,
    Dialog,
    Group,
    Heading,
    Listbox,
    Menu,
    MenuItem,
    MenuItemCheckbox,
    MenuItemRadio,
    Option,
    Presentation,
    Region,
    Separator,
    Slider,
    Tab,
    TabList,
    TabPanel,
    Textbox,
    Tooltip,
}

impl Role {
    /// The `role` attribute token.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Alert => "alert",
            Role::AlertDialog => "alertdialog",
            Role::Button => "button",
            Role::Combobox => "combobox",
            Role::Dialog => "dialog",
            Role::Group => "group",
            Role::Heading => "heading",
            Role::Listbox => "listbox",
            Role::Menu => "menu",
            Role::MenuItem => "menuitem",
            Role::MenuItemCheckbox => "menuitemcheckbox",
            Role::MenuItemRadio => "menuitemradio",
            Role::Option => "option",
            Role::Presentation => "presentation",
            Role::Region => "region",
            Role::Separator => "separator",
            Role::Slider => "slider",
            Role::Tab => "tab",
            Role::TabList => "tablist",
            Role::TabPanel => "tabpanel",
            Role::Textbox => "textbox",
            Role::Tooltip => "tooltip",
        }
    }

    /// Whether the role describes an interactive widget (as opposed to
    /// document structure).
    pub fn is_widget(self) -> bool {
        matches!(
            self,
            Role::Button
                | Role::Combobox
                | Role::Listbox
                | Role::Menu
                | Role::MenuItem
                | Role::MenuItemCheckbox
                | Role::MenuItemRadio
                | Role::Option
                | Role::Slider
                | Role::Tab
                | Role::TabList
                | Role::Textbox
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `aria-*` states and properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attr {
    ActiveDescendant,
    Autocomplete,
    Checked,
    Controls,
    DescribedBy,
    Disabled,
    Expanded,
    HasPopup,
    Hidden,
    KeyShortcuts,
    Label,
    LabelledBy,
    Level,
    Live,
    Modal,
    Multiselectable,
    Orientation,
    PosInSet,
    Pressed,
    RoleDescription,
    Selected,
    SetSize,
    ValueMax,
    ValueMin,
    ValueNow,
    ValueText,
}

impl Attr {
    /// The full attribute name, e.g. `aria-expanded`.
    pub fn name(self) -> &'static str {
        match self {
            Attr::ActiveDescendant => "aria-activedescendant",
            Attr::Autocomplete => "aria-autocomplete",
            Attr::Checked => "aria-checked",
            Attr::Controls => "aria-controls",
            Attr::DescribedBy => "aria-describedby",
            Attr::Disabled => "aria-disabled",
            Attr::Expanded => "aria-expanded",
            Attr::HasPopup => "aria-haspopup",
            Attr::Hidden => "aria-hidden",
            Attr::KeyShortcuts => "aria-keyshortcuts",
            Attr::Label => "aria-label",
            Attr::LabelledBy => "aria-labelledby",
            Attr::Level => "aria-level",
            Attr::Live => "aria-live",
            Attr::Modal => "aria-modal",
            Attr::Multiselectable => "aria-multiselectable",
            Attr::Orientation => "aria-orientation",
            Attr::PosInSet => "aria-posinset",
            Attr::Pressed => "aria-pressed",
            Attr::RoleDescription => "aria-roledescription",
            Attr::Selected => "aria-selected",
            Attr::SetSize => "aria-setsize",
            Attr::ValueMax => "aria-valuemax",
            Attr::ValueMin => "aria-valuemin",
            Attr::ValueNow => "aria-valuenow",
            Attr::ValueText => "aria-valuetext",
        }
    }
}

/// The value of an `aria-*` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    /// The tristate `mixed` value of `aria-checked` / `aria-pressed`.
    Mixed,
    Int(i64),
    Number(f64),
    Text(String),
    Id(ElementId),
    Ids(Vec<ElementId>),
    Token(&'static str),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Mixed => f.write_str("mixed"),
            AttrValue::Int(n) => write!(f, "{n}"),
            AttrValue::Number(n) => write!(f, "{n}"),
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Id(id) => write!(f, "{id}"),
            AttrValue::Ids(ids) => {
                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{id}")?;
                }
                Ok(())
            }
            AttrValue::Token(t) => f.write_str(t),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<Option<bool>> for AttrValue {
    fn from(b: Option<bool>) -> Self {
        b.map_or(AttrValue::Mixed, AttrValue::Bool)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Int(n)
    }
}

impl From<usize> for AttrValue {
    fn from(n: usize) -> Self {
        AttrValue::Int(n as i64)
    }
}

impl From<u8> for AttrValue {
    fn from(n: u8) -> Self {
        AttrValue::Int(n.into())
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<ElementId> for AttrValue {
    fn from(id: ElementId) -> Self {
        AttrValue::Id(id)
    }
}

impl From<&ElementId> for AttrValue {
    fn from(id: &ElementId) -> Self {
        AttrValue::Id(id.clone())
    }
}

impl From<Vec<ElementId>> for AttrValue {
    fn from(ids: Vec<ElementId>) -> Self {
        AttrValue::Ids(ids)
    }
}

impl From<Orientation> for AttrValue {
    fn from(o: Orientation) -> Self {
        AttrValue::Token(o.as_str())
    }
}

impl From<Politeness> for AttrValue {
    fn from(p: Politeness) -> Self {
        AttrValue::Token(p.as_str())
    }
}

/// Layout axis of a composite widget; drives which arrow keys navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

/// Politeness level of a live region or announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Politeness {
    Off,
    #[default]
    Polite,
    Assertive,
}

impl Politeness {
    pub fn as_str(self) -> &'static str {
        match self {
            Politeness::Off => "off",
            Politeness::Polite => "polite",
            Politeness::Assertive => "assertive",
        }
    }
}

/// Keyboard reachability of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabIndex {
    /// In the sequential tab order (`tabindex="0"`).
    Tabbable,
    /// Focusable by script only (`tabindex="-1"`).
    Programmatic,
    /// No `tabindex`; the element is not focusable.
    #[default]
    Inert,
}

impl TabIndex {
    /// The numeric `tabindex` value, or `None` when the attribute is absent.
    pub fn value(self) -> Option<i32> {
        match self {
            TabIndex::Tabbable => Some(0),
            TabIndex::Programmatic => Some(-1),
            TabIndex::Inert => None,
        }
    }

    pub fn is_focusable(self) -> bool {
        !matches!(self, TabIndex::Inert)
    }
}

/// One element of a widget's accessibility tree.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessNode {
    pub id: ElementId,
    pub role: Option<Role>,
    /// Visible text content the consumer is expected to render.
    pub text: Option<String>,
    pub tab_index: TabIndex,
    pub attrs: BTreeMap<Attr, AttrValue>,
    pub children: Vec<AccessNode>,
}

impl AccessNode {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            role: None,
            text: None,
            tab_index: TabIndex::Inert,
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn tab_index(mut self, tab_index: TabIndex) -> Self {
        self.tab_index = tab_index;
        self
    }

    pub fn attr(mut self, attr: Attr, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(attr, value.into());
        self
    }

    /// Set `attr` only when `cond` holds.
    pub fn attr_if(self, cond: bool, attr: Attr, value: impl Into<AttrValue>) -> Self {
        if cond {
            self.attr(attr, value)
        } else {
            self
        }
    }

    /// Set `attr` when `value` is `Some`.
    pub fn attr_opt<V: Into<AttrValue>>(self, attr: Attr, value: Option<V>) -> Self {
        match value {
            Some(v) => self.attr(attr, v),
            None => self,
        }
    }

    /// Mark the node `aria-hidden="true"` when `hidden`.
    pub fn hidden(self, hidden: bool) -> Self {
        self.attr_if(hidden, Attr::Hidden, true)
    }

    pub fn child(mut self, child: AccessNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = AccessNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn get(&self, attr: Attr) -> Option<&AttrValue> {
        self.attrs.get(&attr)
    }

    /// The attribute rendered as its markup string.
    pub fn attr_string(&self, attr: Attr) -> Option<String> {
        self.attrs.get(&attr).map(|v| v.to_string())
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self.get(Attr::Hidden), Some(AttrValue::Bool(true)))
    }

    /// Depth-first, pre-order list of this node and its descendants.
    pub fn walk(&self) -> Vec<&AccessNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Find a node by id anywhere in this subtree.
    pub fn find(&self, id: &str) -> Option<&AccessNode> {
        self.walk().into_iter().find(|n| n.id.as_str() == id)
    }

    /// All nodes in this subtree with the given role, in document order.
    pub fn find_role(&self, role: Role) -> Vec<&AccessNode> {
        self.walk()
            .into_iter()
            .filter(|n| n.role == Some(role))
            .collect()
    }

    /// Ids of the nodes reachable by Tab, in document order, skipping hidden
    /// subtrees.
    pub fn focusable_ids(&self) -> Vec<ElementId> {
        fn collect(node: &AccessNode, out: &mut Vec<ElementId>) {
            if node.is_hidden() {
                return;
            }
            if node.tab_index == TabIndex::Tabbable {
                out.push(node.id.clone());
            }
            for child in &node.children {
                collect(child, out);
            }
        }
        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:width$}", "", width = depth * 2)?;
        match self.role {
            Some(role) => write!(f, "{role}")?,
            None => f.write_str("generic")?,
        }
        write!(f, " #{}", self.id)?;
        if let Some(text) = &self.text {
            write!(f, " {text:?}")?;
        }
        if let Some(n) = self.tab_index.value() {
            write!(f, " tabindex={n}")?;
        }
        if !self.attrs.is_empty() {
            f.write_str(" [")?;
            for (i, (attr, value)) in self.attrs.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}={}", attr.name(), value)?;
            }
            f.write_str("]")?;
        }
        for child in &self.children {
            f.write_str("\n")?;
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for AccessNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> AccessNode {
        AccessNode::new(ElementId::new("list"))
            .role(Role::Listbox)
            .attr(Attr::Multiselectable, true)
            .child(
                AccessNode::new(ElementId::new("a"))
                    .role(Role::Option)
                    .text("Apple")
                    .tab_index(TabIndex::Tabbable),
            )
            .child(
                AccessNode::new(ElementId::new("b"))
                    .role(Role::Option)
                    .text("Banana")
                    .hidden(true)
                    .child(
                        AccessNode::new(ElementId::new("b-inner")).tab_index(TabIndex::Tabbable),
                    ),
            )
    }

    #[test]
    fn attr_values_render_as_markup() {
        assert_eq!(AttrValue::from(true).to_string(), "true");
        assert_eq!(AttrValue::from(None::<bool>).to_string(), "mixed");
        assert_eq!(AttrValue::from(5.0).to_string(), "5");
        assert_eq!(AttrValue::from(2.5).to_string(), "2.5");
        assert_eq!(AttrValue::from(3usize).to_string(), "3");
        let ids = vec![ElementId::new("x"), ElementId::new("y")];
        assert_eq!(AttrValue::from(ids).to_string(), "x y");
        assert_eq!(AttrValue::from(Orientation::Vertical).to_string(), "vertical");
    }

    #[test]
    fn attr_if_and_opt() {
        let node = AccessNode::new(ElementId::new("n"))
            .attr_if(false, Attr::Expanded, true)
            .attr_opt(Attr::Label, Some("hi"))
            .attr_opt::<&str>(Attr::ValueText, None);
        assert!(node.get(Attr::Expanded).is_none());
        assert_eq!(node.attr_string(Attr::Label).as_deref(), Some("hi"));
        assert!(node.get(Attr::ValueText).is_none());
    }

    #[test]
    fn walk_is_preorder() {
        let t = tree();
        let ids: Vec<_> = t.walk().iter().map(|n| n.id.to_string()).collect();
        assert_eq!(ids, vec!["list", "a", "b", "b-inner"]);
    }

    #[test]
    fn find_and_find_role() {
        let t = tree();
        assert_eq!(t.find("b").and_then(|n| n.text.as_deref()), Some("Banana"));
        assert!(t.find("zzz").is_none());
        assert_eq!(t.find_role(Role::Option).len(), 2);
    }

    #[test]
    fn focusable_ids_skip_hidden_subtrees() {
        assert_eq!(tree().focusable_ids(), vec![ElementId::new("a")]);
    }

    #[test]
    fn outline_is_indented() {
        let out = tree().to_string();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "listbox #list [aria-multiselectable=true]");
        assert_eq!(lines[1], "  option #a \"Apple\" tabindex=0");
        assert_eq!(lines[2], "  option #b \"Banana\" [aria-hidden=true]");
        assert_eq!(lines[3], "    generic #b-inner tabindex=0");
    }

    #[test]
    fn role_tokens() {
        assert_eq!(Role::AlertDialog.as_str(), "alertdialog");
        assert_eq!(Role::MenuItemRadio.to_string(), "menuitemradio");
        assert!(Role::Slider.is_widget());
        assert!(!Role::Region.is_widget());
    }
}
