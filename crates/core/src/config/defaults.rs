//! Default values and functions for configuration

use super::{Mapping, Profile};

// Default constants
pub(crate) const DEFAULT_ACTIVE_PROFILE: &str = "UWP";
pub(crate) const DEFAULT_INDENT_SIZE: usize = 4;
pub(crate) const DEFAULT_MAX_SUB_PROPERTY_DEPTH: usize = 5;
pub(crate) const MAX_INDENT_SIZE: usize = 16;

pub(crate) fn default_active_profile() -> String {
    DEFAULT_ACTIVE_PROFILE.to_string()
}

pub(crate) fn default_indent_size() -> usize {
    DEFAULT_INDENT_SIZE
}

pub(crate) fn default_max_sub_property_depth() -> usize {
    DEFAULT_MAX_SUB_PROPERTY_DEPTH
}

pub(crate) fn default_excluded_properties() -> Vec<String> {
    vec!["IsInDesignMode*".to_string()]
}

pub(crate) fn default_profiles() -> Vec<Profile> {
    vec![uwp_stack_panel_profile(), uwp_grid_profile()]
}

const COLLECTION_TYPES: &str =
    "List<T>|ObservableCollection<T>|IEnumerable<T>|IList<T>|ICollection<T>|T[]";

fn common_mappings(row: &str) -> Vec<Mapping> {
    let list_view = format!(
        "<ListView Header=\"$namewithspaces$\" ItemsSource=\"{{x:Bind ViewModel.$name$}}\"{row}>\n<ListView.ItemTemplate>\n<DataTemplate>\n<StackPanel>\n$subprops$\n</StackPanel>\n</DataTemplate>\n</ListView.ItemTemplate>\n</ListView>"
    );

    vec![
        Mapping::new(
            "string",
            format!(
                "<PasswordBox Header=\"$namewithspaces$\" Password=\"{{x:Bind ViewModel.$name$, Mode=TwoWay}}\"{row} />"
            ),
        )
        .with_name_contains("password|pwd"),
        Mapping::new(
            "string",
            format!(
                "<TextBox Header=\"$namewithspaces$\" Text=\"{{x:Bind ViewModel.$name$, Mode=TwoWay}}\"{row} />"
            ),
        ),
        Mapping::new(
            "string",
            format!("<TextBlock Text=\"{{x:Bind ViewModel.$name$}}\"{row} />"),
        )
        .read_only(),
        Mapping::new(
            "int|long|short|double|float|decimal",
            format!(
                "<Slider Header=\"$namewithspaces$\" Minimum=\"0\" Maximum=\"100\" Value=\"{{x:Bind ViewModel.$name$, Mode=TwoWay}}\"{row} />"
            ),
        ),
        Mapping::new(
            "int|long|short|double|float|decimal",
            format!("<TextBlock Text=\"{{x:Bind ViewModel.$name$}}\"{row} />"),
        )
        .read_only(),
        Mapping::new(
            "bool",
            format!(
                "<ToggleSwitch Header=\"$namewithspaces$\" IsOn=\"{{x:Bind ViewModel.$name$, Mode=TwoWay}}\"{row} />"
            ),
        ),
        Mapping::new(
            "bool",
            format!("<CheckBox Content=\"$namewithspaces$\" IsChecked=\"{{x:Bind ViewModel.$name$}}\" IsEnabled=\"False\"{row} />"),
        )
        .read_only(),
        Mapping::new(
            "DateTime|DateTimeOffset",
            format!(
                "<DatePicker Header=\"$namewithspaces$\" Date=\"{{x:Bind ViewModel.$name$, Mode=TwoWay}}\"{row} />"
            ),
        ),
        Mapping::new(
            "TimeSpan",
            format!(
                "<TimePicker Header=\"$namewithspaces$\" Time=\"{{x:Bind ViewModel.$name$, Mode=TwoWay}}\"{row} />"
            ),
        ),
        Mapping::new(
            "Uri",
            format!("<HyperlinkButton Content=\"$namewithspaces$\" NavigateUri=\"{{x:Bind ViewModel.$name$}}\"{row} />"),
        )
        .read_only(),
        Mapping::new(
            "enum",
            format!("<StackPanel{row}>\n<TextBlock Text=\"$namewithspaces$\" />\n$members$\n</StackPanel>"),
        ),
        Mapping::new(COLLECTION_TYPES, list_view.clone()),
        Mapping::new(COLLECTION_TYPES, list_view).read_only(),
        Mapping::new("ICommand", format!("<Button Content=\"$namewithspaces$\" Command=\"{{x:Bind ViewModel.$name$}}\"{row} />"))
            .read_only(),
    ]
}

fn uwp_stack_panel_profile() -> Profile {
    Profile {
        name: DEFAULT_ACTIVE_PROFILE.to_string(),
        class_grouping: "StackPanel".to_string(),
        fallback_output: "<TextBlock Text=\"{x:Bind ViewModel.$name$}\" />".to_string(),
        sub_property_output: "<TextBlock Text=\"{Binding $name$}\" />".to_string(),
        enum_member_output: "<RadioButton Content=\"$elementwithspaces$\" GroupName=\"$enumname$\" IsChecked=\"{x:Bind ViewModel.$enumname$, Converter={StaticResource EnumToBooleanConverter}, ConverterParameter=$element$, Mode=TwoWay}\" />".to_string(),
        mappings: common_mappings(""),
    }
}

fn uwp_grid_profile() -> Profile {
    Profile {
        name: "UWP Grid".to_string(),
        class_grouping: "grid-plus-rowdefs-2cols".to_string(),
        fallback_output: "<TextBlock Text=\"$namewithspaces$\" Grid.Row=\"$incint$\" />\n<TextBlock Text=\"{x:Bind ViewModel.$name$}\" Grid.Row=\"$repint$\" Grid.Column=\"1\" />".to_string(),
        sub_property_output: "<TextBlock Text=\"{Binding $name$}\" />".to_string(),
        enum_member_output: "<RadioButton Content=\"$elementwithspaces$\" GroupName=\"$enumname$\" IsChecked=\"{x:Bind ViewModel.$enumname$, Converter={StaticResource EnumToBooleanConverter}, ConverterParameter=$element$, Mode=TwoWay}\" />".to_string(),
        mappings: common_mappings(" Grid.Row=\"$incint$\" Grid.ColumnSpan=\"2\""),
    }
}
